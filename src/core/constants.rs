// World timer
pub const STARTING_TIME_SECONDS: f64 = 30.0;
pub const DOOM_TIME_SECONDS: f64 = 30.0;
pub const KILL_TIME_BONUS_SECONDS: f64 = 1.0;

// Default milestone schedule (elapsed seconds)
pub const MILESTONE_HUNTSMAN_SECONDS: f64 = 30.0;
pub const MILESTONE_FORESTER_SECONDS: f64 = 60.0;
pub const MILESTONE_MERCENARY_SECONDS: f64 = 90.0;
pub const MILESTONE_BOSS_SECONDS: f64 = 120.0;

// World tick (spawn waves)
pub const FIRST_WORLD_TICK_MS: u64 = 3000;
pub const WORLD_TICK_INTERVAL_MS: u64 = 3000;
pub const BASE_WAVE_SIZE: u32 = 2;
pub const WAVE_GROWTH_EVERY_TICKS: u32 = 2;
pub const DIFFICULTY_RAMP_DIVISOR: f64 = 64.0;
pub const SPAWN_INNER_DISTANCE: f64 = 150.0;
pub const SPAWN_OUTER_DISTANCE: f64 = 300.0;
pub const OPENING_RING_DISTANCE: f64 = 140.0;
pub const BASE_ENEMY_POWER: f64 = 3.0;

// Enemy power multipliers
pub const SERVANT_POWER_MULTIPLIER: f64 = 1.0;
pub const HUNTSMAN_POWER_MULTIPLIER: f64 = 1.4;
pub const FORESTER_POWER_MULTIPLIER: f64 = 1.9;
pub const MERCENARY_POWER_MULTIPLIER: f64 = 3.0;
pub const BARON_POWER_MULTIPLIER: f64 = 15.0;

// Attack resolution timing
pub const SETTLE_WINDOW_MS: u64 = 400;
pub const CHAIN_DELAY_MS: u64 = 75;
pub const PULL_DELAY_MS: u64 = 50;
pub const DART_STAGGER_MS: u64 = 100;
pub const CHAIN_RANGE: f64 = 350.0;
pub const DEATH_EFFECT_MS: u64 = 500;

// Player
pub const PLAYER_STARTING_POWER: f64 = 2.0;
pub const PLAYER_POWER_PER_LEVEL: f64 = 2.0;
pub const EXP_CHART_LEVELS: usize = 99;
pub const EXP_CHART_INITIAL_COST: f64 = 30.0;
pub const EXP_CHART_STEP: f64 = 60.0;
pub const EXP_CHART_SCALAR: f64 = 0.2;

// Experience drops
pub const EXP_PER_DROP: f64 = 10.0;
pub const EXP_DROP_INNER_DISTANCE: f64 = 90.0;
pub const EXP_DROP_OUTER_DISTANCE: f64 = 150.0;
pub const EXP_DROP_HOMING_SPEED: f64 = 400.0;
pub const EXP_DROP_ABSORB_DISTANCE: f64 = 3.0;

// Loot
pub const LOOT_SLOTS: usize = 3;
/// Relative weights for drawing 1, 2, 3 upgrade picks per offered item.
pub const UPGRADE_COUNT_WEIGHTS: [f64; 3] = [60.0, 30.0, 10.0];

// Body radii used by the headless contact model
pub const PLAYER_RADIUS: f64 = 40.0;
pub const ENEMY_RADIUS: f64 = 35.0;
pub const ATTACK_RADIUS: f64 = 20.0;
pub const DROP_RADIUS: f64 = 60.0;
