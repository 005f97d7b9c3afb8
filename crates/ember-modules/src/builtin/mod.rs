//! Modules shipped with the framework.
//!
//! Each registers its factory through [`MODULE_FACTORIES`], so
//! [`ModuleLoader::bind_registered`](crate::ModuleLoader::bind_registered)
//! picks them all up; a deployment opts in per module by placing the
//! matching source unit in its module directory.
//!
//! [`MODULE_FACTORIES`]: crate::MODULE_FACTORIES

mod basic;
mod developer;
mod manager;

pub use basic::Basic;
pub use developer::Developer;
pub use manager::Manager;
