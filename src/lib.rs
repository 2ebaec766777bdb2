pub mod cli;
pub mod constants;
pub mod functions;
pub mod io;
pub mod kernel;
pub mod lattice;
pub mod velocity_set;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum NodeType {
    Fluid = 0,
    Solid = 1,
}
