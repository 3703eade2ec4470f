pub mod fixed_sensor;
pub mod randomized_sensor;
