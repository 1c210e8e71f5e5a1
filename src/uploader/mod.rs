mod body;
pub mod worker;
