pub mod shared {
    pub mod clock;
    pub mod constants;
    pub mod frame;
    pub mod frame_geometry;
    pub mod interval_timer;
    pub mod region;
    pub mod tracking_config;
}

pub mod detection {
    pub mod domain {
        pub mod candidate_selector;
        pub mod face_detector;
    }
    pub mod infrastructure;
}

pub mod tracking {
    pub mod domain {
        pub mod face_tracker;
        pub mod offset_history;
        pub mod subject_evaluator;
    }
}

pub mod control {
    pub mod domain {
        pub mod motion_controller;
        pub mod motion_executor;
        pub mod motion_intent;
        pub mod motion_transport;
    }
    pub mod infrastructure;
}

pub mod video {
    pub mod domain {
        pub mod frame_source;
    }
    pub mod infrastructure;
}

pub mod pipeline {
    pub mod track_subject_use_case;
    pub mod tracking_logger;
}
