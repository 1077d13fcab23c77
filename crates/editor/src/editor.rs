//! Editor session
//!
//! One [`Editor`] holds the whole working state: the class and skill
//! registries, the global attribute names and the ports it draws on. Every
//! user action is a method here; the UI only forwards events and edits the
//! forms in place.

use serde_json::Value;
use skilleditor_domain::{
    AttributeNames, Class, DomainError, Entity, FieldView, FormContext, LoadOutcome, Mapping,
    Registry, Skill, UpdateOutcome,
};

use crate::error::EditorError;
use crate::ports::{DocumentParser, EntityListView, MaterialCatalog, SaveSink};

/// Everything the session is wired to.
pub struct EditorPorts<V> {
    pub sink: Box<dyn SaveSink>,
    pub parser: Box<dyn DocumentParser>,
    pub materials: Box<dyn MaterialCatalog>,
    pub class_form: V,
    pub skill_form: V,
    pub class_list: Box<dyn EntityListView>,
    pub skill_list: Box<dyn EntityListView>,
}

/// Which document entries were loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: Vec<String>,
    /// Entries in the legacy layout, left unchanged
    pub legacy: Vec<String>,
    /// Entries that could not be loaded at all
    pub skipped: Vec<String>,
}

impl LoadReport {
    pub fn merge(&mut self, other: LoadReport) {
        self.loaded.extend(other.loaded);
        self.legacy.extend(other.legacy);
        self.skipped.extend(other.skipped);
    }
}

/// A registry together with the form and list that show it.
pub struct Pane<E, V> {
    registry: Registry<E>,
    form: V,
    list: Box<dyn EntityListView>,
}

impl<E: Entity, V: FieldView> Pane<E, V> {
    fn new(attributes: &AttributeNames, form: V, mut list: Box<dyn EntityListView>) -> Self {
        let registry = Registry::new(attributes);
        for name in registry.names() {
            list.push(&name);
        }
        list.select(registry.active_index());
        Self {
            registry,
            form,
            list,
        }
    }

    pub fn registry(&self) -> &Registry<E> {
        &self.registry
    }

    pub fn active(&self) -> &E {
        self.registry.active()
    }

    pub fn form(&self) -> &V {
        &self.form
    }

    /// The form the user types into; edits apply on the next update.
    pub fn form_mut(&mut self) -> &mut V {
        &mut self.form
    }

    pub fn list(&self) -> &dyn EntityListView {
        self.list.as_ref()
    }

    fn render(&mut self, attributes: &AttributeNames, materials: &[String]) {
        let index = self.registry.active_index();
        let siblings = self.registry.other_names(index);
        let ctx = FormContext {
            attributes,
            materials,
            siblings: &siblings,
        };
        self.registry.active_mut().build_form(&mut self.form, &ctx);
    }

    fn create(&mut self, attributes: &AttributeNames, materials: &[String]) -> usize {
        let index = self.registry.create(attributes);
        self.list.push(self.registry.active().name());
        self.list.select(index);
        self.render(attributes, materials);
        tracing::info!(kind = E::KIND, name = self.registry.active().name(), "Created");
        index
    }

    fn select(
        &mut self,
        index: usize,
        attributes: &AttributeNames,
        materials: &[String],
    ) -> Result<(), EditorError> {
        if index >= self.registry.len() {
            return Err(DomainError::not_found(E::KIND, index).into());
        }
        if index == self.registry.active_index() {
            return Ok(());
        }
        self.update_active(attributes, materials)?;
        self.registry.select(index)?;
        self.list.select(index);
        self.render(attributes, materials);
        Ok(())
    }

    fn update_active(
        &mut self,
        attributes: &AttributeNames,
        materials: &[String],
    ) -> Result<UpdateOutcome, EditorError> {
        let index = self.registry.active_index();
        let outcome = self.registry.update(index, &self.form)?;
        match &outcome {
            UpdateOutcome::Saved => {}
            UpdateOutcome::Renamed { from } => {
                let name = self.registry.active().name();
                self.list.set_label(index, name);
                tracing::info!(kind = E::KIND, from = %from, to = name, "Renamed");
            }
            UpdateOutcome::NameRejected { attempted } => {
                tracing::warn!(
                    kind = E::KIND,
                    name = self.registry.active().name(),
                    attempted = %attempted,
                    "Name is empty or already in use, keeping the previous name"
                );
                // Put the kept name back into the form.
                self.render(attributes, materials);
            }
        }
        Ok(outcome)
    }

    fn save_active(
        &mut self,
        sink: &dyn SaveSink,
        attributes: &AttributeNames,
        materials: &[String],
    ) -> Result<String, EditorError> {
        self.update_active(attributes, materials)?;
        let entity = self.registry.active();
        let file_name = format!("{}.yml", entity.name());
        sink.save(&file_name, &entity.save_string())?;
        tracing::info!(kind = E::KIND, file = %file_name, "Saved");
        Ok(file_name)
    }

    fn delete_active(
        &mut self,
        attributes: &AttributeNames,
        materials: &[String],
    ) -> Result<E, EditorError> {
        let index = self.registry.active_index();
        let was_last = self.registry.len() == 1;
        let removed = self.registry.remove(index, attributes)?;
        self.list.remove(index);
        if was_last {
            self.list.push(self.registry.active().name());
        }
        self.list.select(self.registry.active_index());
        self.render(attributes, materials);
        tracing::info!(kind = E::KIND, name = removed.name(), "Deleted");
        Ok(removed)
    }

    fn load(
        &mut self,
        doc: &Value,
        attributes: &AttributeNames,
        materials: &[String],
    ) -> Result<LoadReport, EditorError> {
        let entries = match doc {
            Value::Object(entries) => entries,
            Value::Null => return Ok(LoadReport::default()),
            _ => {
                return Err(DomainError::malformed(format!(
                    "{} file must map names to definitions",
                    E::KIND
                ))
                .into())
            }
        };

        let empty = Mapping::new();
        let mut report = LoadReport::default();
        for (name, data) in entries {
            let data = match data {
                Value::Object(data) => data,
                Value::Null => &empty,
                _ => {
                    tracing::warn!(kind = E::KIND, name = %name, "Skipping entry that is not a mapping");
                    report.skipped.push(name.clone());
                    continue;
                }
            };
            let existing = self.registry.position(name);
            match self.registry.load_entry(name, data, attributes) {
                Ok((index, outcome)) => {
                    if existing.is_some() {
                        self.list.set_label(index, name);
                    } else {
                        self.list.push(name);
                    }
                    match outcome {
                        LoadOutcome::Loaded => report.loaded.push(name.clone()),
                        LoadOutcome::Legacy { markers } => {
                            tracing::warn!(
                                kind = E::KIND,
                                name = %name,
                                markers = ?markers,
                                "Legacy layout needs conversion, entry left unchanged"
                            );
                            report.legacy.push(name.clone());
                        }
                    }
                }
                Err(err) => {
                    tracing::warn!(kind = E::KIND, name = %name, error = %err, "Skipping entry");
                    report.skipped.push(name.clone());
                }
            }
        }

        self.list.select(self.registry.active_index());
        self.render(attributes, materials);
        tracing::info!(
            kind = E::KIND,
            loaded = report.loaded.len(),
            legacy = report.legacy.len(),
            skipped = report.skipped.len(),
            "Loaded document"
        );
        Ok(report)
    }

    fn export(&self) -> Vec<(String, String)> {
        self.registry
            .iter()
            .map(|entity| (format!("{}.yml", entity.name()), entity.save_string()))
            .collect()
    }
}

/// The editor's application state.
pub struct Editor<V> {
    classes: Pane<Class, V>,
    skills: Pane<Skill, V>,
    attributes: AttributeNames,
    materials: Vec<String>,
    sink: Box<dyn SaveSink>,
    parser: Box<dyn DocumentParser>,
}

impl<V: FieldView> Editor<V> {
    /// Starts a session with one placeholder class and skill, both forms
    /// rendered.
    pub fn new(ports: EditorPorts<V>, attributes: AttributeNames) -> Self {
        let EditorPorts {
            sink,
            parser,
            materials,
            class_form,
            skill_form,
            class_list,
            skill_list,
        } = ports;

        let mut editor = Self {
            classes: Pane::new(&attributes, class_form, class_list),
            skills: Pane::new(&attributes, skill_form, skill_list),
            materials: materials.materials(),
            attributes,
            sink,
            parser,
        };
        editor.classes.render(&editor.attributes, &editor.materials);
        editor.skills.render(&editor.attributes, &editor.materials);
        tracing::debug!(
            attributes = editor.attributes.len(),
            materials = editor.materials.len(),
            "Editor session started"
        );
        editor
    }

    pub fn classes(&self) -> &Pane<Class, V> {
        &self.classes
    }

    pub fn classes_mut(&mut self) -> &mut Pane<Class, V> {
        &mut self.classes
    }

    pub fn skills(&self) -> &Pane<Skill, V> {
        &self.skills
    }

    pub fn skills_mut(&mut self) -> &mut Pane<Skill, V> {
        &mut self.skills
    }

    pub fn attributes(&self) -> &AttributeNames {
        &self.attributes
    }

    pub fn materials(&self) -> &[String] {
        &self.materials
    }

    pub fn new_class(&mut self) -> usize {
        self.classes.create(&self.attributes, &self.materials)
    }

    pub fn new_skill(&mut self) -> usize {
        self.skills.create(&self.attributes, &self.materials)
    }

    /// Applies pending form edits, then switches to the class at `index`.
    pub fn select_class(&mut self, index: usize) -> Result<(), EditorError> {
        self.classes.select(index, &self.attributes, &self.materials)
    }

    /// Applies pending form edits, then switches to the skill at `index`.
    pub fn select_skill(&mut self, index: usize) -> Result<(), EditorError> {
        self.skills.select(index, &self.attributes, &self.materials)
    }

    pub fn update_active_class(&mut self) -> Result<UpdateOutcome, EditorError> {
        self.classes.update_active(&self.attributes, &self.materials)
    }

    pub fn update_active_skill(&mut self) -> Result<UpdateOutcome, EditorError> {
        self.skills.update_active(&self.attributes, &self.materials)
    }

    /// Applies pending edits and writes `<name>.yml`. Returns the file name.
    pub fn save_active_class(&mut self) -> Result<String, EditorError> {
        self.classes
            .save_active(self.sink.as_ref(), &self.attributes, &self.materials)
    }

    /// Applies pending edits and writes `<name>.yml`. Returns the file name.
    pub fn save_active_skill(&mut self) -> Result<String, EditorError> {
        self.skills
            .save_active(self.sink.as_ref(), &self.attributes, &self.materials)
    }

    pub fn delete_active_class(&mut self) -> Result<Class, EditorError> {
        self.classes.delete_active(&self.attributes, &self.materials)
    }

    pub fn delete_active_skill(&mut self) -> Result<Skill, EditorError> {
        self.skills.delete_active(&self.attributes, &self.materials)
    }

    /// Reads an attribute definitions file; its top-level keys become the
    /// global attribute list. Returns the number of names.
    pub fn import_attributes(&mut self, text: &str) -> Result<usize, EditorError> {
        let doc = self.parser.parse(text)?;
        let attributes = AttributeNames::from_definitions(&doc)?;
        self.set_attributes(attributes)?;
        tracing::info!(count = self.attributes.len(), "Imported attribute definitions");
        Ok(self.attributes.len())
    }

    /// Replaces the global attribute list and reconciles every class.
    pub fn set_attributes(&mut self, attributes: AttributeNames) -> Result<(), EditorError> {
        self.classes.update_active(&self.attributes, &self.materials)?;
        self.attributes = attributes;
        for class in self.classes.registry.iter_mut() {
            let slot = class.attribute_slot();
            class.reconcile_attributes(slot, &self.attributes);
        }
        self.classes.render(&self.attributes, &self.materials);
        Ok(())
    }

    /// Loads a classes document. Entries whose name exists (ignoring case)
    /// are reloaded in place; others are added.
    pub fn load_classes(&mut self, text: &str) -> Result<LoadReport, EditorError> {
        let doc = self.parser.parse(text)?;
        self.classes.load(&doc, &self.attributes, &self.materials)
    }

    /// Loads a skills document. Entries in the legacy layout are reported
    /// and not touched.
    pub fn load_skills(&mut self, text: &str) -> Result<LoadReport, EditorError> {
        let doc = self.parser.parse(text)?;
        self.skills.load(&doc, &self.attributes, &self.materials)
    }

    /// `(file name, contents)` for every class.
    pub fn export_classes(&self) -> Vec<(String, String)> {
        self.classes.export()
    }

    /// `(file name, contents)` for every skill.
    pub fn export_skills(&self) -> Vec<(String, String)> {
        self.skills.export()
    }
}
