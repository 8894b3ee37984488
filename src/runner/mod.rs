pub mod ds;
pub mod model;
pub mod plugin;
pub mod std_lib;
