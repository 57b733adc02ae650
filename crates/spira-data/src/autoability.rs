//! Autoabilities granted by equipment.

use serde::{Deserialize, Serialize};

use crate::stat::{Affinity, Element, Stat, Status};

/// An autoability that can occupy an equipment slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AutoAbility {
    // Weapon abilities.
    /// Shows enemy data.
    Sensor,
    /// Ignores armored damage reduction.
    Piercing,
    /// Act immediately at battle start.
    FirstStrike,
    /// Improves the party's pre-emptive odds.
    Initiative,
    /// Counter physical attacks.
    Counterattack,
    /// Raises the damage ceiling to 99999.
    BreakDamageLimit,
    /// Adds fire to attacks.
    Firestrike,
    /// Adds ice to attacks.
    Icestrike,
    /// Adds lightning to attacks.
    Lightningstrike,
    /// Adds water to attacks.
    Waterstrike,
    /// May inflict darkness.
    Darktouch,
    /// May inflict silence.
    Silencetouch,
    /// May inflict sleep.
    Sleeptouch,
    /// May inflict petrification.
    Stonetouch,
    /// May inflict poison.
    Poisontouch,
    /// Strength +10%.
    StrengthPlus10,
    /// Strength +20%.
    StrengthPlus20,
    /// Magic +10%.
    MagicPlus10,
    /// Magic +20%.
    MagicPlus20,

    // Armor abilities.
    /// Raises the HP ceiling to 99999.
    BreakHpLimit,
    /// Immune to fire.
    Fireproof,
    /// Immune to ice.
    Iceproof,
    /// Immune to lightning.
    Lightningproof,
    /// Immune to water.
    Waterproof,
    /// Absorbs fire.
    FireEater,
    /// Absorbs ice.
    IceEater,
    /// Absorbs lightning.
    LightningEater,
    /// Absorbs water.
    WaterEater,
    /// Immune to petrification.
    Stoneproof,
    /// Immune to poison.
    Poisonproof,
    /// Immune to sleep.
    Sleepproof,
    /// Immune to silence.
    Silenceproof,
    /// Immune to darkness.
    Darkproof,
    /// Permanent Haste.
    AutoHaste,
    /// Permanent Regen.
    AutoRegen,
    /// Permanent Shell.
    AutoShell,
    /// Permanent Protect.
    AutoProtect,
    /// Max HP +10%.
    HpPlus10,
    /// Max HP +30%.
    HpPlus30,
    /// Max MP +10%.
    MpPlus10,
    /// Max MP +30%.
    MpPlus30,
}

impl AutoAbility {
    /// Whether the ability can appear on a weapon.
    pub fn is_weapon_ability(self) -> bool {
        use AutoAbility::*;
        matches!(
            self,
            Sensor
                | Piercing
                | FirstStrike
                | Initiative
                | Counterattack
                | BreakDamageLimit
                | Firestrike
                | Icestrike
                | Lightningstrike
                | Waterstrike
                | Darktouch
                | Silencetouch
                | Sleeptouch
                | Stonetouch
                | Poisontouch
                | StrengthPlus10
                | StrengthPlus20
                | MagicPlus10
                | MagicPlus20
        )
    }

    /// The element this weapon ability adds to attacks.
    pub fn strike_element(self) -> Option<Element> {
        match self {
            Self::Firestrike => Some(Element::Fire),
            Self::Icestrike => Some(Element::Ice),
            Self::Lightningstrike => Some(Element::Lightning),
            Self::Waterstrike => Some(Element::Water),
            _ => None,
        }
    }

    /// Status (and base chance) this weapon ability may inflict on hit.
    pub fn touch_status(self) -> Option<(Status, u32)> {
        match self {
            Self::Darktouch => Some((Status::Darkness, 50)),
            Self::Silencetouch => Some((Status::Silence, 50)),
            Self::Sleeptouch => Some((Status::Sleep, 50)),
            Self::Stonetouch => Some((Status::Petrify, 25)),
            Self::Poisontouch => Some((Status::Poison, 50)),
            _ => None,
        }
    }

    /// Elemental affinity this armor ability grants.
    pub fn elemental_defense(self) -> Option<(Element, Affinity)> {
        match self {
            Self::Fireproof => Some((Element::Fire, Affinity::Immune)),
            Self::Iceproof => Some((Element::Ice, Affinity::Immune)),
            Self::Lightningproof => Some((Element::Lightning, Affinity::Immune)),
            Self::Waterproof => Some((Element::Water, Affinity::Immune)),
            Self::FireEater => Some((Element::Fire, Affinity::Absorb)),
            Self::IceEater => Some((Element::Ice, Affinity::Absorb)),
            Self::LightningEater => Some((Element::Lightning, Affinity::Absorb)),
            Self::WaterEater => Some((Element::Water, Affinity::Absorb)),
            _ => None,
        }
    }

    /// Status this armor ability grants immunity to.
    pub fn proof_status(self) -> Option<Status> {
        match self {
            Self::Stoneproof => Some(Status::Petrify),
            Self::Poisonproof => Some(Status::Poison),
            Self::Sleepproof => Some(Status::Sleep),
            Self::Silenceproof => Some(Status::Silence),
            Self::Darkproof => Some(Status::Darkness),
            _ => None,
        }
    }

    /// Status this ability keeps permanently applied.
    pub fn auto_status(self) -> Option<Status> {
        match self {
            Self::AutoHaste => Some(Status::Haste),
            Self::AutoRegen => Some(Status::Regen),
            Self::AutoShell => Some(Status::Shell),
            Self::AutoProtect => Some(Status::Protect),
            _ => None,
        }
    }

    /// Percentage bonus to a stat, if any.
    pub fn stat_bonus(self) -> Option<(Stat, u32)> {
        match self {
            Self::StrengthPlus10 => Some((Stat::Strength, 10)),
            Self::StrengthPlus20 => Some((Stat::Strength, 20)),
            Self::MagicPlus10 => Some((Stat::Magic, 10)),
            Self::MagicPlus20 => Some((Stat::Magic, 20)),
            Self::HpPlus10 => Some((Stat::Hp, 10)),
            Self::HpPlus30 => Some((Stat::Hp, 30)),
            Self::MpPlus10 => Some((Stat::Mp, 10)),
            Self::MpPlus30 => Some((Stat::Mp, 30)),
            _ => None,
        }
    }

    /// Gil value used for equipment pricing.
    pub fn gil_value(self) -> u32 {
        use AutoAbility::*;
        match self {
            Sensor => 30,
            Piercing => 1_000,
            FirstStrike => 5_000,
            Initiative => 3_000,
            Counterattack => 5_000,
            BreakDamageLimit => 50_000,
            Firestrike | Icestrike | Lightningstrike | Waterstrike => 1_000,
            Darktouch | Silencetouch | Sleeptouch => 1_500,
            Stonetouch => 3_000,
            Poisontouch => 2_000,
            StrengthPlus10 | MagicPlus10 => 2_500,
            StrengthPlus20 | MagicPlus20 => 7_500,
            BreakHpLimit => 50_000,
            Fireproof | Iceproof | Lightningproof | Waterproof => 2_000,
            FireEater | IceEater | LightningEater | WaterEater => 10_000,
            Stoneproof => 4_000,
            Poisonproof | Sleepproof | Silenceproof | Darkproof => 2_000,
            AutoHaste => 30_000,
            AutoRegen => 20_000,
            AutoShell | AutoProtect => 12_000,
            HpPlus10 | MpPlus10 => 1_500,
            HpPlus30 | MpPlus30 => 7_000,
        }
    }

    /// Parse an ability from a user-supplied name (underscores for spaces).
    pub fn parse(s: &str) -> Option<Self> {
        use AutoAbility::*;
        match s.to_lowercase().replace([' ', '-'], "_").as_str() {
            "sensor" => Some(Sensor),
            "piercing" => Some(Piercing),
            "first_strike" => Some(FirstStrike),
            "initiative" => Some(Initiative),
            "counterattack" => Some(Counterattack),
            "break_damage_limit" => Some(BreakDamageLimit),
            "firestrike" => Some(Firestrike),
            "icestrike" => Some(Icestrike),
            "lightningstrike" => Some(Lightningstrike),
            "waterstrike" => Some(Waterstrike),
            "darktouch" => Some(Darktouch),
            "silencetouch" => Some(Silencetouch),
            "sleeptouch" => Some(Sleeptouch),
            "stonetouch" => Some(Stonetouch),
            "poisontouch" => Some(Poisontouch),
            "strength_+10%" | "strength_10" => Some(StrengthPlus10),
            "strength_+20%" | "strength_20" => Some(StrengthPlus20),
            "magic_+10%" | "magic_10" => Some(MagicPlus10),
            "magic_+20%" | "magic_20" => Some(MagicPlus20),
            "break_hp_limit" => Some(BreakHpLimit),
            "fireproof" => Some(Fireproof),
            "iceproof" => Some(Iceproof),
            "lightningproof" => Some(Lightningproof),
            "waterproof" => Some(Waterproof),
            "fire_eater" => Some(FireEater),
            "ice_eater" => Some(IceEater),
            "lightning_eater" => Some(LightningEater),
            "water_eater" => Some(WaterEater),
            "stoneproof" => Some(Stoneproof),
            "poisonproof" => Some(Poisonproof),
            "sleepproof" => Some(Sleepproof),
            "silenceproof" => Some(Silenceproof),
            "darkproof" => Some(Darkproof),
            "auto_haste" => Some(AutoHaste),
            "auto_regen" => Some(AutoRegen),
            "auto_shell" => Some(AutoShell),
            "auto_protect" => Some(AutoProtect),
            "hp_+10%" | "hp_10" => Some(HpPlus10),
            "hp_+30%" | "hp_30" => Some(HpPlus30),
            "mp_+10%" | "mp_10" => Some(MpPlus10),
            "mp_+30%" | "mp_30" => Some(MpPlus30),
            _ => None,
        }
    }
}

impl std::fmt::Display for AutoAbility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use AutoAbility::*;
        let name = match self {
            Sensor => "Sensor",
            Piercing => "Piercing",
            FirstStrike => "First Strike",
            Initiative => "Initiative",
            Counterattack => "Counterattack",
            BreakDamageLimit => "Break Damage Limit",
            Firestrike => "Firestrike",
            Icestrike => "Icestrike",
            Lightningstrike => "Lightningstrike",
            Waterstrike => "Waterstrike",
            Darktouch => "Darktouch",
            Silencetouch => "Silencetouch",
            Sleeptouch => "Sleeptouch",
            Stonetouch => "Stonetouch",
            Poisontouch => "Poisontouch",
            StrengthPlus10 => "Strength +10%",
            StrengthPlus20 => "Strength +20%",
            MagicPlus10 => "Magic +10%",
            MagicPlus20 => "Magic +20%",
            BreakHpLimit => "Break HP Limit",
            Fireproof => "Fireproof",
            Iceproof => "Iceproof",
            Lightningproof => "Lightningproof",
            Waterproof => "Waterproof",
            FireEater => "Fire Eater",
            IceEater => "Ice Eater",
            LightningEater => "Lightning Eater",
            WaterEater => "Water Eater",
            Stoneproof => "Stoneproof",
            Poisonproof => "Poisonproof",
            Sleepproof => "Sleepproof",
            Silenceproof => "Silenceproof",
            Darkproof => "Darkproof",
            AutoHaste => "Auto-Haste",
            AutoRegen => "Auto-Regen",
            AutoShell => "Auto-Shell",
            AutoProtect => "Auto-Protect",
            HpPlus10 => "HP +10%",
            HpPlus30 => "HP +30%",
            MpPlus10 => "MP +10%",
            MpPlus30 => "MP +30%",
        };
        write!(f, "{name}")
    }
}
