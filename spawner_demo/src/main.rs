//! Headless spawner demo
//!
//! Runs a fixed number of simulated frames against an in-memory scene:
//! enemies wander in, fire bullets, and both get despawned back into their
//! pools. Pool statistics are logged every few frames.
//!
//! Usage: `spawner_demo [config.toml|config.ron]`

use rand::prelude::*;
use spawn_pool::prelude::*;

// Configuration constants
const FRAMES: u32 = 600;
const STATS_EVERY: u32 = 120;
const MAX_ENEMIES: usize = 12;
const BULLET_LIFETIME: u32 = 45; // frames

#[derive(thiserror::Error, Debug)]
enum DemoError {
    #[error("config: {0}")]
    Config(#[from] spawn_pool::config::ConfigError),

    #[error("spawn: {0}")]
    Spawn(#[from] SpawnError),
}

struct Bullet {
    handle: Spawned<<MemoryHost as SpawnHost>::Object>,
    fired_at: u32,
}

struct DemoApp {
    spawner: Spawner<MemoryHost>,
    enemy: Template<NodePrototype>,
    bullet: Template<NodePrototype>,
    enemies: Vec<Spawned<<MemoryHost as SpawnHost>::Object>>,
    bullets: Vec<Bullet>,
    rng: StdRng,
}

impl DemoApp {
    fn new(config: SpawnerConfig) -> Self {
        Self {
            spawner: Spawner::with_config(MemoryHost::new(), config),
            enemy: Template::new("Enemy", NodePrototype::new("enemy")),
            bullet: Template::new("Bullet", NodePrototype::new("bullet")),
            enemies: Vec::new(),
            bullets: Vec::new(),
            rng: StdRng::seed_from_u64(42),
        }
    }

    fn random_pose(&mut self) -> Pose {
        let position = Vec3::new(
            self.rng.gen_range(-50.0..50.0),
            0.0,
            self.rng.gen_range(-50.0..50.0),
        );
        let yaw = self.rng.gen_range(0.0..std::f32::consts::TAU);
        Pose::from_euler(position, 0.0, 0.0, yaw)
    }

    fn run(&mut self) -> Result<(), DemoError> {
        self.bullet.prespawn(&mut self.spawner, 32)?;

        for frame in 0..FRAMES {
            self.update(frame)?;

            if frame % STATS_EVERY == 0 {
                let stats = self.spawner.stats();
                log::info!(
                    "frame {:>4}: {} pools, {} active, {} available, {} created, reuse {:.0}%",
                    frame,
                    stats.pools,
                    stats.active,
                    stats.available,
                    stats.created,
                    stats.reuse_ratio() * 100.0
                );
            }
        }

        // Everything still alive goes back to its pool
        self.spawner.despawn_list(&self.enemies)?;
        let bullets: Vec<_> = self.bullets.drain(..).map(|b| b.handle).collect();
        self.spawner.despawn_list(&bullets)?;
        self.enemies.clear();

        let stats = self.spawner.stats();
        log::info!(
            "Finished: {} objects created for {} spawns",
            stats.created,
            stats.created + stats.reused
        );

        let destroyed = self.spawner.shutdown();
        log::info!("Destroyed {} pooled objects", destroyed);
        Ok(())
    }

    fn update(&mut self, frame: u32) -> Result<(), DemoError> {
        if self.enemies.len() < MAX_ENEMIES && self.rng.gen_bool(0.1) {
            let pose = self.random_pose();
            let enemy = self.enemy.spawn(&mut self.spawner, &pose)?;
            log::debug!("Spawned {:?}", self.spawner.host().name(enemy.object));
            self.enemies.push(enemy);
        }

        // Each enemy occasionally fires a bullet from where it stands
        for i in 0..self.enemies.len() {
            if self.rng.gen_bool(0.05) {
                let origin = self.spawner.host().get(self.enemies[i].object).map(|o| o.pose);
                if let Some(pose) = origin {
                    let handle = self.bullet.spawn(&mut self.spawner, &pose)?;
                    self.bullets.push(Bullet { handle, fired_at: frame });
                }
            }
        }

        let (expired, live): (Vec<_>, Vec<_>) = self
            .bullets
            .drain(..)
            .partition(|b| frame - b.fired_at >= BULLET_LIFETIME);
        self.bullets = live;
        for bullet in expired {
            bullet.handle.despawn(&mut self.spawner)?;
        }

        if !self.enemies.is_empty() && self.rng.gen_bool(0.04) {
            let index = self.rng.gen_range(0..self.enemies.len());
            let enemy = self.enemies.swap_remove(index);
            // Go through the name convention like engine-side callers do
            self.spawner.despawn_object(enemy.object)?;
        }

        Ok(())
    }
}

fn load_config() -> Result<SpawnerConfig, DemoError> {
    match std::env::args().nth(1) {
        Some(path) => Ok(SpawnerConfig::load_from_file(&path)?),
        None => Ok(SpawnerConfig::default().with_prespawn("Enemy", 4)),
    }
}

fn main() -> Result<(), DemoError> {
    let config = load_config()?;

    // Initialize logging
    let filter = config.log_filter.clone().unwrap_or_else(|| "info".to_string());
    spawn_pool::foundation::logging::init_with_filter(&filter);

    log::info!("Starting spawner demo ({} frames)", FRAMES);

    let mut app = DemoApp::new(config);
    match app.run() {
        Ok(()) => {
            log::info!("Spawner demo completed successfully");
            Ok(())
        }
        Err(e) => {
            log::error!("Spawner demo failed: {}", e);
            Err(e)
        }
    }
}
