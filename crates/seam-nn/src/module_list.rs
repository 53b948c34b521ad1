use seam_core::{Result, Tensor};

use crate::module::Module;

/// A container holding sub-modules in an indexed list.
///
/// `ModuleList` does not chain forward calls; it is a bookkeeping container
/// iterated manually inside an owning module's `forward`. Its presence under
/// a well-known name (e.g. a transformer's block list) is one of the
/// structural markers the compatibility layer detects.
pub struct ModuleList {
    modules: Vec<Box<dyn Module>>,
}

impl ModuleList {
    /// Create a new ModuleList from a vector of modules.
    pub fn new(modules: Vec<Box<dyn Module>>) -> Self {
        Self { modules }
    }

    /// Create an empty ModuleList.
    pub fn empty() -> Self {
        Self { modules: Vec::new() }
    }

    /// Append a module to the list.
    pub fn push(&mut self, module: Box<dyn Module>) {
        self.modules.push(module);
    }

    /// Number of sub-modules.
    pub fn len(&self) -> usize {
        self.modules.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Reference to the module at the given index.
    pub fn get(&self, index: usize) -> Option<&dyn Module> {
        self.modules.get(index).map(|m| m.as_ref())
    }

    /// Iterate over sub-modules by reference.
    pub fn iter(&self) -> impl Iterator<Item = &Box<dyn Module>> {
        self.modules.iter()
    }
}

impl std::ops::Index<usize> for ModuleList {
    type Output = dyn Module;
    fn index(&self, index: usize) -> &Self::Output {
        self.modules[index].as_ref()
    }
}

impl Module for ModuleList {
    /// Forward is not chained; the input passes through unchanged.
    fn forward(&self, input: &Tensor) -> Result<Tensor> {
        Ok(input.clone())
    }

    fn parameters(&self) -> Vec<&Tensor> {
        self.modules.iter().flat_map(|m| m.parameters()).collect()
    }
}
