pub use steps::Steps;

mod steps;
