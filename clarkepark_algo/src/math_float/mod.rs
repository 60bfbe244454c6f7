pub mod space_vector;
pub mod transforms;
