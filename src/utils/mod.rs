pub mod pagination;
pub mod salary;
pub mod text;
pub mod time;
