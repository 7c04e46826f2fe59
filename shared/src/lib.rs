use serde::{Deserialize, Serialize};

pub const WORLD_WIDTH: f32 = 1200.0;
pub const WORLD_HEIGHT: f32 = 800.0;
pub const RADIUS: f32 = 20.0;
pub const MELEE_RANGE: f32 = 60.0;
pub const WHIRLWIND_RADIUS: f32 = 80.0;
pub const FIREBALL_RANGE: f32 = 320.0;
pub const FIREBALL_WIDTH: f32 = 28.0;
pub const HEAL_AMOUNT: i32 = 3;
pub const BOT_MAX: usize = 6;
pub const BOT_HP: i32 = 2;
pub const BOT_SPEED: f32 = 2.0;
pub const BOT_ATTACK_COOLDOWN_MS: u32 = 600;
pub const TICK_MS: u64 = 120;
pub const BROADCAST_TICK_MS: u64 = 120;
pub const PROTOCOL_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub enum Packet {
    Connect {
        client_version: u32,
    },
    Heartbeat,
    ChooseClass {
        sequence: u32,
        class: PlayerClass,
    },
    Move {
        sequence: u32,
        x: f32,
        y: f32,
    },
    Attack {
        sequence: u32,
        x: f32,
        y: f32,
    },
    Skill {
        sequence: u32,
        x: f32,
        y: f32,
    },
    Disconnect,

    Connected {
        client_id: u32,
    },
    Disconnected {
        reason: String,
    },
    CurrentRoster {
        players: Vec<Player>,
    },
    BotRoster {
        bots: Vec<Bot>,
    },
    FullState {
        tick: u32,
        timestamp: u64,
        players: Vec<Player>,
        bots: Vec<Bot>,
    },
    PlayerJoined {
        player: Player,
    },
    PlayerLeft {
        id: u32,
    },
    PlayerMoved {
        player: Player,
    },
    PlayerDied {
        id: u32,
    },
    AttackEffect {
        id: u32,
        dx: f32,
        dy: f32,
    },
    SkillEffect {
        id: u32,
        effect: SkillEffect,
    },
}

impl Packet {
    /// Per-session ordering number carried by gameplay commands
    pub fn sequence(&self) -> Option<u32> {
        match self {
            Packet::ChooseClass { sequence, .. }
            | Packet::Move { sequence, .. }
            | Packet::Attack { sequence, .. }
            | Packet::Skill { sequence, .. } => Some(*sequence),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlayerClass {
    Warrior,
    Mage,
    Guardian,
    Cleric,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum SkillKind {
    Whirlwind,
    Fireball,
    Shield,
    Heal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassDef {
    pub max_hp: i32,
    pub max_energy: i32,
    pub skill: SkillKind,
}

/// Indexed by `PlayerClass as usize`.
pub const CLASS_TABLE: [ClassDef; 4] = [
    ClassDef {
        max_hp: 9,
        max_energy: 3,
        skill: SkillKind::Whirlwind,
    },
    ClassDef {
        max_hp: 8,
        max_energy: 3,
        skill: SkillKind::Fireball,
    },
    ClassDef {
        max_hp: 11,
        max_energy: 3,
        skill: SkillKind::Shield,
    },
    ClassDef {
        max_hp: 9,
        max_energy: 3,
        skill: SkillKind::Heal,
    },
];

impl PlayerClass {
    pub const ALL: [PlayerClass; 4] = [
        PlayerClass::Warrior,
        PlayerClass::Mage,
        PlayerClass::Guardian,
        PlayerClass::Cleric,
    ];

    pub fn def(self) -> ClassDef {
        CLASS_TABLE[self as usize]
    }

    /// Unknown names fall back to warrior.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "mage" => PlayerClass::Mage,
            "guardian" => PlayerClass::Guardian,
            "cleric" => PlayerClass::Cleric,
            _ => PlayerClass::Warrior,
        }
    }
}

/// Visual payload of a successful skill cast
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub enum SkillEffect {
    Whirlwind,
    Fireball { ux: f32, uy: f32 },
    Shield,
    Heal,
}

impl SkillEffect {
    pub fn kind(&self) -> SkillKind {
        match self {
            SkillEffect::Whirlwind => SkillKind::Whirlwind,
            SkillEffect::Fireball { .. } => SkillKind::Fireball,
            SkillEffect::Shield => SkillKind::Shield,
            SkillEffect::Heal => SkillKind::Heal,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Player {
    pub id: u32,
    pub class: PlayerClass,
    pub x: f32,
    pub y: f32,
    pub hp: i32,
    pub max_hp: i32,
    pub energy: i32,
    pub max_energy: i32,
    pub shield: u8,
}

impl Player {
    pub fn new(id: u32, class: PlayerClass, x: f32, y: f32) -> Self {
        let def = class.def();
        let (x, y) = clamp_to_world(x, y);
        Self {
            id,
            class,
            x,
            y,
            hp: def.max_hp,
            max_hp: def.max_hp,
            energy: 0,
            max_energy: def.max_energy,
            shield: 0,
        }
    }

    pub fn has_full_energy(&self) -> bool {
        self.energy >= self.max_energy
    }

    pub fn grant_energy(&mut self, amount: i32) {
        self.energy = (self.energy + amount).clamp(0, self.max_energy);
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Bot {
    pub id: u32,
    pub x: f32,
    pub y: f32,
    pub hp: i32,
    pub cooldown_ms: u32,
}

impl Bot {
    pub fn new(id: u32, x: f32, y: f32) -> Self {
        let (x, y) = clamp_to_world(x, y);
        Self {
            id,
            x,
            y,
            hp: BOT_HP,
            cooldown_ms: 0,
        }
    }
}

/// Anything with a world position
pub trait Positioned {
    fn position(&self) -> (f32, f32);

    fn set_position(&mut self, x: f32, y: f32);

    /// Clamps the position into the playable area.
    fn apply_bounds(&mut self) {
        let (x, y) = self.position();
        let (x, y) = clamp_to_world(x, y);
        self.set_position(x, y);
    }
}

impl Positioned for Player {
    fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }
}

impl Positioned for Bot {
    fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }

    fn set_position(&mut self, x: f32, y: f32) {
        self.x = x;
        self.y = y;
    }
}

pub fn distance<A: Positioned + ?Sized, B: Positioned + ?Sized>(a: &A, b: &B) -> f32 {
    let (ax, ay) = a.position();
    let (bx, by) = b.position();
    (ax - bx).hypot(ay - by)
}

pub fn clamp_to_world(x: f32, y: f32) -> (f32, f32) {
    (
        x.clamp(RADIUS, WORLD_WIDTH - RADIUS),
        y.clamp(RADIUS, WORLD_HEIGHT - RADIUS),
    )
}

/// Unit vector, or (0, 0) for a zero-length or non-finite input.
///
/// The magnitude is taken in f64 so that components near `f32::MAX` still
/// normalize instead of overflowing to infinity.
pub fn normalize_vector(x: f32, y: f32) -> (f32, f32) {
    let (x, y) = (f64::from(x), f64::from(y));
    let magnitude = x.hypot(y);
    if magnitude > 0.0 && magnitude.is_finite() {
        ((x / magnitude) as f32, (y / magnitude) as f32)
    } else {
        (0.0, 0.0)
    }
}

/// Keeps `value` if it is a usable number, otherwise falls back to `current`.
pub fn coerce_coordinate(value: f32, current: f32) -> f32 {
    if value.is_finite() {
        value
    } else {
        current
    }
}
