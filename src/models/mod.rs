pub mod dto;
pub mod employee;
pub mod job_position;
