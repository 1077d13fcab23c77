//! Skill entity - an ability written to the plugin's skill files
//!
//! A skill has fixed fields plus a tree of components describing what it
//! does. Skills saved by old plugin versions use a different layout which
//! is detected on load and left for a separate conversion step.

use crate::attributes::AttributeNames;
use crate::component::{Component, KeyAllocator};
use crate::entity::{self, Entity, FormContext, LoadOutcome};
use crate::field::Field;
use crate::save_format::{self, Mapping, INDENT};
use crate::view::{FieldView, FormAction, Section};

/// Top-level keys that only appear in the legacy skill layout.
pub const LEGACY_MARKERS: [&str; 3] = ["active", "embed", "passive"];

#[derive(Debug, Clone, PartialEq)]
pub struct Skill {
    fields: Vec<Field>,
    components: Vec<Component>,
}

impl Skill {
    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn add_component(&mut self, component: Component) {
        self.components.push(component);
    }

    /// Removes and returns the top-level component at `index`.
    pub fn remove_component(&mut self, index: usize) -> Option<Component> {
        (index < self.components.len()).then(|| self.components.remove(index))
    }

    /// Whether a top-level component (a trigger) has the given name.
    pub fn uses_trigger(&self, trigger: &str) -> bool {
        self.components.iter().any(|c| c.name() == trigger)
    }
}

impl Entity for Skill {
    const KIND: &'static str = "Skill";

    fn new(name: &str, _attributes: &AttributeNames) -> Self {
        let fields = vec![
            Field::text("Name", "name", name)
                .with_tooltip("The internal name of the skill. This should not contain color codes"),
            Field::text("Type", "type", "Dynamic")
                .with_tooltip("Flavour text describing the skill, e.g. 'AOE utility'"),
            Field::int("Max Level", "max-level", 5)
                .with_tooltip("The highest level the skill can reach"),
            Field::choice("Skill Req", "skill-req", &["None"], "None")
                .with_tooltip("The skill that must be learned before this one"),
            Field::int("Skill Req Level", "skill-req-lvl", 1)
                .with_tooltip("The level the required skill must reach"),
            Field::choice("Needs Permission", "needs-permission", &["True", "False"], "False")
                .with_tooltip("Whether the skill needs the permission \"skillapi.skill.{name}\""),
            Field::attribute("Level Req", "level", 1.0, 0.0)
                .with_tooltip("The class level needed to unlock or upgrade the skill"),
            Field::attribute("Cost", "cost", 1.0, 0.0)
                .with_tooltip("Skill points needed to unlock or upgrade the skill"),
            Field::attribute("Cooldown", "cooldown", 0.0, 0.0)
                .with_tooltip("Seconds before the skill can be cast again. Only applies to cast triggers"),
            Field::attribute("Mana", "mana", 0.0, 0.0)
                .with_tooltip("Mana consumed on cast. Only applies to cast triggers"),
            Field::attribute("Min Spent", "points-spent-req", 0.0, 0.0)
                .with_tooltip("Skill points that must be spent before upgrading the skill"),
            Field::text("Cast Message", "msg", "&6{player} &2has cast &6{skill}")
                .with_tooltip("Message shown to nearby players when the skill is cast"),
            Field::text("Combo", "combo", "")
                .with_tooltip("Click combo that casts the skill, keys separated by spaces (L R S LS RS P Q F)"),
            Field::choice("Indicator", "indicator", &["2D", "3D", "None"], "2D")
                .with_tooltip("What to display for the hover bar cast mode"),
            Field::material("Icon", "icon", "Jack O Lantern")
                .with_tooltip("The item shown for the skill in menus"),
            Field::int("Icon Data", "icon-data", 0)
                .with_tooltip("The durability or data value of the icon"),
            Field::lines(
                "Icon Lore",
                "icon-lore",
                [
                    "&d{name} &7({level}/{max})",
                    "&2Type: &6{type}",
                    "",
                    "{req:level}Level: {attr:level}",
                    "{req:cost}Cost: {attr:cost}",
                    "",
                    "&2Mana: {attr:mana}",
                    "&2Cooldown: {attr:cooldown}",
                ],
            )
            .with_tooltip("The description shown for the skill in menus"),
            Field::lines("Incompatible", "incompatible", Vec::<String>::new())
                .with_tooltip("Skills that cannot be learned together with this one")
                .in_section(Section::Attributes),
        ];
        Self {
            fields,
            components: Vec::new(),
        }
    }

    fn fields(&self) -> &[Field] {
        &self.fields
    }

    fn fields_mut(&mut self) -> &mut [Field] {
        &mut self.fields
    }

    fn build_form(&mut self, view: &mut dyn FieldView, ctx: &FormContext<'_>) {
        let requirements = std::iter::once("None".to_string())
            .chain(ctx.siblings.iter().cloned())
            .collect();
        if let Some(requirement) = self.field_mut(Section::Root, "skill-req") {
            requirement.set_options(requirements);
        }

        view.clear();
        view.heading("Skill Details");
        view.separator();
        view.action(FormAction::Done);
        view.separator();
        for field in &self.fields {
            field.render(view, ctx.materials);
        }
        view.separator();
        view.action(FormAction::Done);
    }

    fn save_string(&self) -> String {
        let mut out = entity::save_fields(self.name(), &self.fields);
        if !self.components.is_empty() {
            let indent = format!("{INDENT}{INDENT}");
            let mut keys = KeyAllocator::new();
            out.push_str(&format!("{INDENT}components:\n"));
            for component in &self.components {
                out.push_str(&component.save_string(&indent, &mut keys));
            }
        }
        out
    }

    fn load(&mut self, data: &Mapping) -> LoadOutcome {
        let markers: Vec<&'static str> = LEGACY_MARKERS
            .into_iter()
            .filter(|marker| save_format::is_set(data, marker))
            .collect();
        if !markers.is_empty() {
            return LoadOutcome::Legacy { markers };
        }

        entity::load_fields(&mut self.fields, data);
        if let Some(components) = data.get("components").and_then(|c| c.as_object()) {
            self.components.clear();
            for (key, parsed) in components {
                match Component::load(key, parsed) {
                    Ok(component) => self.components.push(component),
                    Err(err) => {
                        tracing::warn!(skill = self.name(), component = %key, error = %err, "Skipping unreadable component")
                    }
                }
            }
        }
        LoadOutcome::Loaded
    }
}
