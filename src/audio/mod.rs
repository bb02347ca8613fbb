pub mod renderer;
pub mod resolver;
