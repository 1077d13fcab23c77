//! Class entity - a player profession written to the plugin's class files
//!
//! Besides its fixed fields a class carries one scaling attribute per
//! globally configured attribute name. That slice is regenerated whenever
//! the form is built, keeping any base/scale the user already entered.

use crate::attributes::AttributeNames;
use crate::entity::{self, Entity, FormContext, LoadOutcome};
use crate::field::Field;
use crate::save_format::Mapping;
use crate::view::{FieldView, FormAction, Section};

/// Hint rendered where the generated attributes start.
pub const ATTRIBUTE_DROP_HINT: &str = "Drag/Drop your attributes.yml file to see custom attributes";

/// Experience sources understood by the plugin, in bit order.
pub const EXP_SOURCES: [&str; 9] = [
    "Mob",
    "Block Break",
    "Block Place",
    "Craft",
    "Command",
    "Special",
    "Exp Bottle",
    "Smelt",
    "Quest",
];

const SKILL_TREES: [&str; 6] = [
    "Basic Horizontal",
    "Basic Vertical",
    "Level Horizontal",
    "Level Vertical",
    "Flood",
    "Requirement",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    fields: Vec<Field>,
    /// Keys of the attribute fields generated from the global list
    generated: Vec<String>,
}

impl Class {
    /// Index right after the built-in mana attribute, where the generated
    /// attributes live.
    pub fn attribute_slot(&self) -> usize {
        self.fields
            .iter()
            .position(|f| f.section() == Section::Attributes && f.key() == "mana")
            .map_or(self.fields.len(), |i| i + 1)
    }

    /// Number of attribute fields generated from the global list.
    pub fn generated_attributes(&self) -> usize {
        self.generated.len()
    }

    /// Replaces the generated attribute fields with one field per global
    /// attribute name, inserted at `start`.
    ///
    /// Fields are matched by lowercase key, so existing base/scale values
    /// survive reordering; new names start at `(0, 0)`. Names that collide
    /// with a built-in attribute are skipped. Only previously generated
    /// fields are removed and `start` is clamped to the field count.
    /// Calling this twice with the same list changes nothing.
    pub fn reconcile_attributes(&mut self, start: usize, attributes: &AttributeNames) {
        let mut start = start.min(self.fields.len());
        let mut previous = Vec::with_capacity(self.generated.len());
        let mut i = 0;
        while i < self.fields.len() {
            let field = &self.fields[i];
            let was_generated = field.is_attribute() && self.generated.iter().any(|k| k == field.key());
            if was_generated {
                previous.push(self.fields.remove(i));
                if i < start {
                    start -= 1;
                }
            } else {
                i += 1;
            }
        }

        let reserved: Vec<String> = self
            .fields
            .iter()
            .filter(|f| f.section() == Section::Attributes)
            .map(|f| f.key().to_lowercase())
            .collect();

        let mut seen: Vec<String> = Vec::new();
        let generated: Vec<Field> = attributes
            .iter()
            .map(str::to_lowercase)
            .filter(|key| {
                let fresh = !reserved.contains(key) && !seen.contains(key);
                if fresh {
                    seen.push(key.clone());
                }
                fresh
            })
            .map(|key| {
                let mut field = Field::attribute(title_case(&key), key.as_str(), 0.0, 0.0)
                    .with_tooltip(format!("The amount of {key} the class should have"));
                if let Some((base, scale)) = previous
                    .iter()
                    .find(|old| old.key() == key)
                    .and_then(Field::as_attribute)
                {
                    field.set_attribute(base, scale);
                }
                field
            })
            .collect();

        tracing::trace!(
            class = self.name(),
            removed = previous.len(),
            added = generated.len(),
            "Reconciled class attributes"
        );
        self.generated = generated.iter().map(|f| f.key().to_string()).collect();
        self.fields.splice(start..start, generated);
    }
}

impl Entity for Class {
    const KIND: &'static str = "Class";

    fn new(name: &str, attributes: &AttributeNames) -> Self {
        let fields = vec![
            Field::text("Name", "name", name)
                .with_tooltip("The internal name of the class. This should not contain color codes"),
            Field::text("Prefix", "prefix", format!("&6{name}"))
                .with_tooltip("The name shown before player names. Color codes are allowed"),
            Field::text("Group", "group", "class")
                .with_tooltip("A player can have one class per group, e.g. 'race' or 'class'"),
            Field::text("Mana Name", "mana", "&2Mana")
                .with_tooltip("The name of the class's mana resource"),
            Field::int("Max Level", "max-level", 40)
                .with_tooltip("The highest level the class can reach"),
            Field::choice("Parent", "parent", &["None"], "None")
                .with_tooltip("The class that must be completed before this one. Load it into the editor to list it here"),
            Field::choice("Needs Permission", "needs-permission", &["True", "False"], "False")
                .with_tooltip("Whether the class needs the permission \"skillapi.class.{name}\""),
            Field::flags("Exp Sources", "exp-source", &EXP_SOURCES, 273)
                .with_tooltip("Where the class gains experience from. Most need 'use-exp-orbs' in config.yml"),
            Field::attribute("Health", "health", 20.0, 0.0)
                .with_tooltip("The health the class starts with"),
            Field::attribute("Mana", "mana", 20.0, 0.0)
                .with_tooltip("The mana the class starts with"),
            Field::double("Mana Regen", "mana-regen", 1.0)
                .with_tooltip("Mana regained per regeneration interval, set in config.yml"),
            Field::choice("Skill Tree", "tree", &SKILL_TREES, "Requirement")
                .with_tooltip("The layout of the class's skill tree"),
            Field::lines("Skills", "skills", Vec::<String>::new())
                .with_tooltip("The skills the class can use, one per line"),
            Field::material("Icon", "icon", "Jack O Lantern")
                .with_tooltip("The item shown for the class in menus"),
            Field::int("Icon Data", "icon-data", 0)
                .with_tooltip("The durability or data value of the icon"),
            Field::lines("Icon Lore", "icon-lore", [format!("&d{name}")]),
            Field::lines("Blacklist", "blacklist", Vec::<String>::new())
                .with_tooltip("Items the class cannot use, one per line"),
            Field::text("Action Bar", "action-bar", "")
                .with_tooltip("Action bar format. Leave empty for the default"),
        ];
        let mut class = Self {
            fields,
            generated: Vec::new(),
        };
        let slot = class.attribute_slot();
        class.reconcile_attributes(slot, attributes);
        class
    }

    fn fields(&self) -> &[Field] {
        &self.fields
    }

    fn fields_mut(&mut self) -> &mut [Field] {
        &mut self.fields
    }

    fn build_form(&mut self, view: &mut dyn FieldView, ctx: &FormContext<'_>) {
        let slot = self.attribute_slot();
        self.reconcile_attributes(slot, ctx.attributes);

        let parents = std::iter::once("None".to_string())
            .chain(ctx.siblings.iter().cloned())
            .collect();
        if let Some(parent) = self.field_mut(Section::Root, "parent") {
            parent.set_options(parents);
        }

        view.clear();
        view.heading("Class Details");
        view.separator();
        for (i, field) in self.fields.iter().enumerate() {
            if i == slot {
                view.note(ATTRIBUTE_DROP_HINT);
            }
            field.render(view, ctx.materials);
        }
        view.separator();
        view.action(FormAction::Save);
        view.action(FormAction::Delete);
    }

    fn save_string(&self) -> String {
        entity::save_fields(self.name(), &self.fields)
    }

    fn load(&mut self, data: &Mapping) -> LoadOutcome {
        entity::load_fields(&mut self.fields, data);
        LoadOutcome::Loaded
    }
}

fn title_case(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::{ControlId, FormBuffer, FormItem};

    fn attrs(names: &[&str]) -> AttributeNames {
        AttributeNames::new(names.iter().copied())
    }

    fn generated(class: &Class) -> Vec<(String, (f64, f64))> {
        let slot = class.attribute_slot();
        class.fields()[slot..slot + class.generated_attributes()]
            .iter()
            .map(|f| (f.key().to_string(), f.as_attribute().unwrap_or_default()))
            .collect()
    }

    #[test]
    fn reconcile_generates_one_field_per_lowercase_key() {
        let mut class = Class::new("Warrior", &attrs(&["Ärger", "ärger", "Strength"]));
        let keys: Vec<String> = generated(&class).into_iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["ärger", "strength"]);

        let slot = class.attribute_slot();
        class.reconcile_attributes(slot, &attrs(&["ärger", "STRENGTH"]));
        let count = class
            .fields()
            .iter()
            .filter(|f| f.section() == Section::Attributes && f.key() == "ärger")
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn new_class_has_name_first_and_generated_attributes() {
        let class = Class::new("Warrior", &attrs(&["Strength", "Agility"]));
        assert_eq!(class.name(), "Warrior");
        assert_eq!(class.fields()[0].key(), "name");
        assert_eq!(
            generated(&class),
            vec![
                ("strength".to_string(), (0.0, 0.0)),
                ("agility".to_string(), (0.0, 0.0))
            ]
        );
        let strength = class.field(Section::Attributes, "strength").expect("strength");
        assert_eq!(strength.label(), "Strength");
    }

    #[test]
    fn reconcile_preserves_matching_values() {
        let mut class = Class::new("Warrior", &attrs(&["Strength", "Agility"]));
        class
            .field_mut(Section::Attributes, "strength")
            .expect("strength")
            .set_attribute(5.0, 1.0);

        let slot = class.attribute_slot();
        class.reconcile_attributes(slot, &attrs(&["Strength", "Intellect"]));

        assert_eq!(
            generated(&class),
            vec![
                ("strength".to_string(), (5.0, 1.0)),
                ("intellect".to_string(), (0.0, 0.0))
            ]
        );
        assert!(class.field(Section::Attributes, "agility").is_none());
    }

    #[test]
    fn reconcile_is_idempotent() {
        let names = attrs(&["Strength", "Agility"]);
        let mut class = Class::new("Warrior", &names);
        class
            .field_mut(Section::Attributes, "agility")
            .expect("agility")
            .set_attribute(3.0, 0.5);

        let slot = class.attribute_slot();
        class.reconcile_attributes(slot, &names);
        let once = class.clone();
        class.reconcile_attributes(slot, &names);
        assert_eq!(class, once);
    }

    #[test]
    fn reconcile_out_of_range_start_keeps_neighbours() {
        let names = attrs(&["Strength"]);
        let mut class = Class::new("Warrior", &names);
        class
            .field_mut(Section::Attributes, "strength")
            .expect("strength")
            .set_attribute(4.0, 2.0);
        let original = class.clone();
        let fixed_keys = |c: &Class| -> Vec<String> {
            c.fields()
                .iter()
                .filter(|f| f.key() != "strength")
                .map(|f| f.key().to_string())
                .collect()
        };

        class.reconcile_attributes(usize::MAX, &names);
        assert_eq!(fixed_keys(&class), fixed_keys(&original));
        assert_eq!(class.fields().last().map(Field::key), Some("strength"));
        assert_eq!(
            class.field(Section::Attributes, "strength").and_then(Field::as_attribute),
            Some((4.0, 2.0))
        );

        let slot = class.attribute_slot();
        class.reconcile_attributes(slot, &names);
        assert_eq!(class, original);
    }

    #[test]
    fn reconcile_with_empty_list_removes_generated_only() {
        let mut class = Class::new("Warrior", &attrs(&["Strength"]));
        let slot = class.attribute_slot();
        class.reconcile_attributes(slot, &attrs(&[]));
        assert_eq!(class.generated_attributes(), 0);
        assert_eq!(class.fields()[slot].key(), "mana-regen");
        assert_eq!(
            class.field(Section::Attributes, "health").and_then(Field::as_attribute),
            Some((20.0, 0.0))
        );
    }

    #[test]
    fn builtin_attribute_names_are_not_duplicated() {
        let class = Class::new("Warrior", &attrs(&["Health", "Strength"]));
        let healths = class
            .fields()
            .iter()
            .filter(|f| f.section() == Section::Attributes && f.key() == "health")
            .count();
        assert_eq!(healths, 1);
        assert_eq!(class.generated_attributes(), 1);
    }

    #[test]
    fn build_form_refreshes_parent_options_and_attributes() {
        let mut class = Class::new("Warrior", &attrs(&["Strength"]));
        let mut form = FormBuffer::new();
        let names = attrs(&["Strength", "Spirit"]);
        let siblings = vec!["Mage".to_string(), "Rogue".to_string()];
        let ctx = FormContext {
            attributes: &names,
            materials: &[],
            siblings: &siblings,
        };

        class.build_form(&mut form, &ctx);

        let parent = form.find_control(&ControlId::root("parent")).expect("parent control");
        assert!(matches!(
            &parent.kind,
            crate::view::ControlKind::Select { options, .. } if options == &["None", "Mage", "Rogue"]
        ));
        assert!(form.find_control(&ControlId::attribute("spirit")).is_some());
        assert!(form.items().contains(&FormItem::Note(ATTRIBUTE_DROP_HINT.to_string())));
        assert_eq!(form.items().last(), Some(&FormItem::Action(FormAction::Delete)));
    }

    #[test]
    fn save_string_writes_root_then_attributes() {
        let class = Class::new("Warrior", &attrs(&["Strength"]));
        let saved = class.save_string();

        assert!(saved.starts_with("Warrior:\n  name: 'Warrior'\n  prefix: '&6Warrior'\n"));
        assert!(saved.contains("  mana: '&2Mana'\n"));
        assert!(saved.contains("  exp-source:\n    - 'Mob'\n    - 'Command'\n    - 'Quest'\n"));
        let attributes = saved.find("  attributes:\n").expect("attributes block");
        let health = saved.find("    health:\n      base: 20\n      scale: 0\n").expect("health");
        let strength = saved.find("    strength:\n").expect("strength");
        assert!(attributes < health && health < strength);
        assert!(!saved[attributes..].contains("max-level"));
    }
}
