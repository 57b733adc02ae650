//! The item catalog.

use serde::{Deserialize, Serialize};

/// A consumable or sphere item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Item {
    /// Restores a little HP.
    Potion,
    /// Restores more HP.
    HiPotion,
    /// Fully restores HP.
    XPotion,
    /// Restores MP.
    Ether,
    /// Revives a character.
    PhoenixDown,
    /// Cures poison.
    Antidote,
    /// Cures petrification.
    SoftenerStone,
    /// Cures darkness.
    EyeDrops,
    /// Cures silence.
    EchoScreen,
    /// Fire-elemental throwable.
    BombFragment,
    /// Lightning-elemental throwable.
    ElectroMarble,
    /// Water-elemental throwable.
    FishScale,
    /// Ice-elemental throwable.
    ArcticWind,
    /// Non-elemental throwable.
    Grenade,
    /// Sphere-grid currency.
    PowerSphere,
    /// Sphere-grid currency.
    ManaSphere,
    /// Sphere-grid currency.
    SpeedSphere,
    /// Sphere-grid currency.
    AbilitySphere,
    /// Teaches an aeon a physical boost.
    PowerDistiller,
    /// Rare crafting item.
    StaminaSpring,
    /// Rare crafting item.
    ManaSpring,
    /// Extremely rare crafting item.
    WingsToDiscovery,
}

impl Item {
    /// Parse an item from a user-supplied name (underscores for spaces).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().replace([' ', '-'], "_").as_str() {
            "potion" => Some(Self::Potion),
            "hi_potion" | "hipotion" => Some(Self::HiPotion),
            "x_potion" | "xpotion" => Some(Self::XPotion),
            "ether" => Some(Self::Ether),
            "phoenix_down" => Some(Self::PhoenixDown),
            "antidote" => Some(Self::Antidote),
            "softener_stone" | "soft" => Some(Self::SoftenerStone),
            "eye_drops" => Some(Self::EyeDrops),
            "echo_screen" => Some(Self::EchoScreen),
            "bomb_fragment" => Some(Self::BombFragment),
            "electro_marble" => Some(Self::ElectroMarble),
            "fish_scale" => Some(Self::FishScale),
            "arctic_wind" => Some(Self::ArcticWind),
            "grenade" => Some(Self::Grenade),
            "power_sphere" => Some(Self::PowerSphere),
            "mana_sphere" => Some(Self::ManaSphere),
            "speed_sphere" => Some(Self::SpeedSphere),
            "ability_sphere" => Some(Self::AbilitySphere),
            "power_distiller" => Some(Self::PowerDistiller),
            "stamina_spring" => Some(Self::StaminaSpring),
            "mana_spring" => Some(Self::ManaSpring),
            "wings_to_discovery" => Some(Self::WingsToDiscovery),
            _ => None,
        }
    }
}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Potion => "Potion",
            Self::HiPotion => "Hi-Potion",
            Self::XPotion => "X-Potion",
            Self::Ether => "Ether",
            Self::PhoenixDown => "Phoenix Down",
            Self::Antidote => "Antidote",
            Self::SoftenerStone => "Softener Stone",
            Self::EyeDrops => "Eye Drops",
            Self::EchoScreen => "Echo Screen",
            Self::BombFragment => "Bomb Fragment",
            Self::ElectroMarble => "Electro Marble",
            Self::FishScale => "Fish Scale",
            Self::ArcticWind => "Arctic Wind",
            Self::Grenade => "Grenade",
            Self::PowerSphere => "Power Sphere",
            Self::ManaSphere => "Mana Sphere",
            Self::SpeedSphere => "Speed Sphere",
            Self::AbilitySphere => "Ability Sphere",
            Self::PowerDistiller => "Power Distiller",
            Self::StaminaSpring => "Stamina Spring",
            Self::ManaSpring => "Mana Spring",
            Self::WingsToDiscovery => "Wings to Discovery",
        };
        write!(f, "{name}")
    }
}
