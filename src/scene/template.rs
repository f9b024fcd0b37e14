//! Shape templates that instances are created from.

use std::collections::HashMap;

use super::material::MaterialId;
use crate::asset::ShapeHandle;

/// What a shape handle instantiates into.
#[derive(Clone, Debug, PartialEq)]
pub struct Template {
    /// Material used by the instance's renderer. `None` produces an instance
    /// without a render component.
    pub material: Option<MaterialId>,
}

impl Template {
    pub fn rendered(material: MaterialId) -> Self {
        Self {
            material: Some(material),
        }
    }

    pub fn empty() -> Self {
        Self { material: None }
    }
}

/// Registry of loadable shape templates.
#[derive(Debug, Default)]
pub struct TemplateLibrary {
    templates: HashMap<ShapeHandle, Template>,
}

impl TemplateLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the template behind `handle`.
    pub fn register(&mut self, handle: ShapeHandle, template: Template) {
        self.templates.insert(handle, template);
    }

    pub fn unregister(&mut self, handle: &ShapeHandle) -> Option<Template> {
        self.templates.remove(handle)
    }

    pub fn get(&self, handle: &ShapeHandle) -> Option<&Template> {
        self.templates.get(handle)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
