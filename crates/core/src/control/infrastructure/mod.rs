pub mod logging_transport;
