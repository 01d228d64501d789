use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest health a unit can have. Units start at full health.
pub const MAX_HEALTH: u8 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Player {
    Attacker,
    Defender,
}

impl Player {
    /// The other side.
    #[inline]
    pub fn next(self) -> Player {
        match self {
            Player::Attacker => Player::Defender,
            Player::Defender => Player::Attacker,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Player::Attacker => "Attacker",
            Player::Defender => "Defender",
        }
    }

    #[inline]
    fn initial(self) -> char {
        match self {
            Player::Attacker => 'a',
            Player::Defender => 'd',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Unit kinds. The discriminant is the row/column index into the combat tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitType {
    AI = 0,
    Tech = 1,
    Virus = 2,
    Program = 3,
    Firewall = 4,
}

pub const NUM_UNIT_TYPES: usize = 5;

impl UnitType {
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// AI, Firewall and Program only step towards the enemy and freeze once engaged.
    #[inline]
    pub fn is_restricted_mover(self) -> bool {
        matches!(self, UnitType::AI | UnitType::Firewall | UnitType::Program)
    }

    #[inline]
    fn initial(self) -> char {
        match self {
            UnitType::AI => 'A',
            UnitType::Tech => 'T',
            UnitType::Virus => 'V',
            UnitType::Program => 'P',
            UnitType::Firewall => 'F',
        }
    }
}

// ==================== Combat Tables ====================

/// Damage dealt by `[attacker kind][defender kind]`.
pub static DAMAGE_TABLE: [[u8; NUM_UNIT_TYPES]; NUM_UNIT_TYPES] = [
    [3, 3, 3, 3, 1], // AI
    [1, 1, 6, 1, 1], // Tech
    [9, 6, 1, 6, 1], // Virus
    [3, 3, 3, 3, 1], // Program
    [1, 1, 1, 1, 1], // Firewall
];

/// Health restored by `[repairer kind][target kind]`. Zero means the pair cannot repair.
pub static REPAIR_TABLE: [[u8; NUM_UNIT_TYPES]; NUM_UNIT_TYPES] = [
    [0, 1, 1, 0, 0], // AI
    [3, 0, 0, 3, 3], // Tech
    [0, 0, 0, 0, 0], // Virus
    [0, 0, 0, 0, 0], // Program
    [0, 0, 0, 0, 0], // Firewall
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unit {
    pub player: Player,
    pub kind: UnitType,
    pub health: u8,
}

impl Unit {
    pub fn new(player: Player, kind: UnitType) -> Self {
        Unit {
            player,
            kind,
            health: MAX_HEALTH,
        }
    }

    pub fn with_health(player: Player, kind: UnitType, health: u8) -> Self {
        Unit {
            player,
            kind,
            health: health.min(MAX_HEALTH),
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    /// Apply a signed health change, clamped to `0..=MAX_HEALTH`.
    #[inline]
    pub fn mod_health(&mut self, delta: i32) {
        let health = (self.health as i32)
            .saturating_add(delta)
            .clamp(0, MAX_HEALTH as i32);
        self.health = health as u8;
    }

    /// Damage this unit inflicts on `target`, never more than the target has left.
    #[inline]
    pub fn damage_amount(&self, target: &Unit) -> u8 {
        DAMAGE_TABLE[self.kind.index()][target.kind.index()].min(target.health)
    }

    /// Health this unit restores on `target`, never past full health.
    #[inline]
    pub fn repair_amount(&self, target: &Unit) -> u8 {
        REPAIR_TABLE[self.kind.index()][target.kind.index()]
            .min(MAX_HEALTH.saturating_sub(target.health))
    }

    /// Whether this kind can repair `target`'s kind at all, regardless of health.
    #[inline]
    pub fn can_repair(&self, target: &Unit) -> bool {
        REPAIR_TABLE[self.kind.index()][target.kind.index()] > 0
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = format!(
            "{}{}{}",
            self.player.initial(),
            self.kind.initial(),
            self.health
        );
        f.pad(&label)
    }
}
