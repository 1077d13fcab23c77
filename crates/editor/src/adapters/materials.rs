//! Built-in icon material catalogue.

use crate::ports::MaterialCatalog;

/// Display names of the item materials offered for icons.
pub const MATERIALS: &[&str] = &[
    "Apple",
    "Arrow",
    "Blaze Powder",
    "Blaze Rod",
    "Bone",
    "Book",
    "Bow",
    "Bread",
    "Cake",
    "Compass",
    "Diamond",
    "Diamond Axe",
    "Diamond Chestplate",
    "Diamond Sword",
    "Emerald",
    "Ender Pearl",
    "Eye Of Ender",
    "Feather",
    "Fire Charge",
    "Fishing Rod",
    "Flint And Steel",
    "Ghast Tear",
    "Glowstone Dust",
    "Gold Ingot",
    "Golden Apple",
    "Iron Axe",
    "Iron Chestplate",
    "Iron Sword",
    "Jack O Lantern",
    "Leather Chestplate",
    "Magma Cream",
    "Nether Star",
    "Paper",
    "Potion",
    "Redstone",
    "Shield",
    "Slime Ball",
    "Snow Ball",
    "Stick",
    "Stone Sword",
    "Sugar",
    "TNT",
    "Wooden Sword",
];

/// Serves [`MATERIALS`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinMaterials;

impl MaterialCatalog for BuiltinMaterials {
    fn materials(&self) -> Vec<String> {
        MATERIALS.iter().map(|m| m.to_string()).collect()
    }
}
