use std::collections::BTreeMap;
use std::sync::Arc;

use crate::skill::SkillTemplate;
use crate::types::SkillId;

/// Read-only registry of skill templates, shared by every instance.
#[derive(Clone, Debug, Default)]
pub struct SkillLibrary {
    templates: BTreeMap<SkillId, Arc<SkillTemplate>>,
}

impl SkillLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a template, replacing any previous one with the same id.
    pub fn insert(&mut self, template: SkillTemplate) {
        self.templates.insert(template.id.clone(), Arc::new(template));
    }

    pub fn with(mut self, template: SkillTemplate) -> Self {
        self.insert(template);
        self
    }

    pub fn get(&self, id: &SkillId) -> Option<Arc<SkillTemplate>> {
        self.templates.get(id).cloned()
    }

    pub fn contains(&self, id: &SkillId) -> bool {
        self.templates.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &SkillId> {
        self.templates.keys()
    }
}

impl FromIterator<SkillTemplate> for SkillLibrary {
    fn from_iter<I: IntoIterator<Item = SkillTemplate>>(iter: I) -> Self {
        let mut library = Self::new();
        for template in iter {
            library.insert(template);
        }
        library
    }
}
