//! Scene scheduling: periodic state sampling, flash decisions and dispatch.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use log::{debug, error, info};

use crate::convert::Gamut;
use crate::errors::Error;
use crate::gateway::{BridgeGateway, LightCommand};
use crate::light::{LightId, LightTarget};
use crate::runtime::{self, Instant};
use crate::sampler::{ColorSampler, TemperatureModel};
use crate::types::{Color, ColorPalette, LightState, TransitionTime};

type Result<T> = std::result::Result<T, Error>;

/// Timing and behavior of a scene.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneOptions {
    /// Wait before the first tick.
    pub start_delay: Duration,
    /// Pause between the end of one tick and the start of the next.
    pub update_interval: Duration,
    /// Give every light the same state each tick.
    pub synchronized: bool,
    /// Fade duration for normal updates; `None` leaves it to the gateway.
    pub transition: Option<TransitionTime>,
    /// Minimum time between flash windows; `None` disables flashing.
    pub flash_interval: Option<Duration>,
    /// Upper bound for a single light command; `None` waits indefinitely.
    pub dispatch_timeout: Option<Duration>,
    /// Bounds and clamp for sampled color temperatures.
    pub temperature: TemperatureModel,
    /// Fixed RNG seed for reproducible runs.
    pub seed: Option<u64>,
}

impl Default for SceneOptions {
    fn default() -> Self {
        SceneOptions {
            start_delay: Duration::ZERO,
            update_interval: Duration::from_secs(1),
            synchronized: false,
            transition: None,
            flash_interval: None,
            dispatch_timeout: None,
            temperature: TemperatureModel::default(),
            seed: None,
        }
    }
}

/// Where a scene is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenePhase {
    /// Waiting for the start delay to elapse.
    Pending,
    /// Ticking; `ticks` counts completed ticks.
    Running { ticks: u64 },
}

/// Running totals for a scene.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SceneStats {
    /// Ticks completed.
    pub ticks: u64,
    /// Light commands issued.
    pub commands: u64,
    /// Light commands that failed.
    pub failures: u64,
    /// Ticks with at least one failed command.
    pub failed_ticks: u64,
    /// Light commands sent as flashes.
    pub flashes: u64,
}

/// The command decided for one light in a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedCommand {
    pub target: LightTarget,
    /// The sampled state the command was built from.
    pub state: LightState,
    pub command: LightCommand,
    /// Sent with the short flash transition.
    pub flash: bool,
}

/// Everything a tick decided, before anything is sent.
#[derive(Debug, Clone, PartialEq)]
pub struct TickPlan {
    pub at: Instant,
    pub commands: Vec<PlannedCommand>,
    /// The flash cooldown had elapsed, whether or not any light flashed.
    pub flash_gate_open: bool,
}

impl TickPlan {
    /// Number of lights flashing this tick.
    pub fn flashes(&self) -> usize {
        self.commands.iter().filter(|c| c.flash).count()
    }
}

/// Per-light outcomes of a dispatched tick.
#[derive(Debug, Default)]
pub struct TickReport {
    pub succeeded: Vec<LightId>,
    pub failed: Vec<Error>,
}

impl TickReport {
    /// Whether every light accepted its command.
    pub fn is_ok(&self) -> bool {
        self.failed.is_empty()
    }
}

/// A group of lights cycling through randomized states on its own schedule.
///
/// # Example
///
/// ```ignore
/// let palette = ColorPalette::new(vec![Color::rgb(255, 0, 0), Color::rgb(254, 0, 0)])?;
/// let options = SceneOptions {
///     update_interval: Duration::from_millis(500),
///     transition: Some(TransitionTime::from_ticks(1000)),
///     flash_interval: Some(Duration::from_secs(65)),
///     ..SceneOptions::default()
/// };
/// let scene = Scene::new("horror", gateway, Gamut::A, lights, palette, options)?;
/// scene.run().await;
/// ```
pub struct Scene<G> {
    name: String,
    gateway: Arc<G>,
    gamut: Gamut,
    lights: Vec<LightTarget>,
    palette: ColorPalette,
    options: SceneOptions,
    sampler: ColorSampler,
    last_color: Color,
    /// `None` until the gate first opens in a delayed scene.
    last_flash: Option<Instant>,
    phase: ScenePhase,
    stats: SceneStats,
}

impl<G: BridgeGateway> Scene<G> {
    /// Create a new scene over already resolved lights.
    ///
    /// Fails on a zero update interval or unusable temperature bounds.
    pub fn new(
        name: &str,
        gateway: Arc<G>,
        gamut: Gamut,
        lights: Vec<LightTarget>,
        palette: ColorPalette,
        options: SceneOptions,
    ) -> Result<Self> {
        if options.update_interval.is_zero() {
            return Err(Error::ZeroUpdateInterval(name.to_string()));
        }

        let sampler = match options.seed {
            Some(seed) => ColorSampler::seeded(seed, options.temperature)?,
            None => ColorSampler::new(options.temperature)?,
        };
        // A delayed scene may flash on its first tick
        let last_flash = options.start_delay.is_zero().then(Instant::now);

        Ok(Scene {
            name: String::from(name),
            gateway,
            gamut,
            lights,
            last_color: palette.first(),
            palette,
            options,
            sampler,
            last_flash,
            phase: ScenePhase::Pending,
            stats: SceneStats::default(),
        })
    }

    /// Get the scene name, used in log output.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the member lights.
    pub fn lights(&self) -> &[LightTarget] {
        &self.lights
    }

    /// Get the palette colors are picked from.
    pub fn palette(&self) -> &ColorPalette {
        &self.palette
    }

    pub fn options(&self) -> &SceneOptions {
        &self.options
    }

    pub fn phase(&self) -> ScenePhase {
        self.phase
    }

    /// Totals since the scene was created.
    pub fn stats(&self) -> SceneStats {
        self.stats
    }

    /// The most recently selected color.
    pub fn last_color(&self) -> Color {
        self.last_color
    }

    /// Run forever: wait for the start delay, then tick every update interval.
    ///
    /// Failed commands are logged and never stop the loop. The future only
    /// ends when it is dropped or its task aborted.
    pub async fn run(mut self) {
        loop {
            self.advance().await;
        }
    }

    /// Run the same loop as [`Self::run`], bounded to `ticks` ticks.
    ///
    /// The start delay is only waited for on the first call; later calls
    /// pause one update interval before their first tick.
    pub async fn run_ticks(&mut self, ticks: u64) {
        for _ in 0..ticks {
            self.advance().await;
        }
    }

    async fn advance(&mut self) {
        match self.phase {
            ScenePhase::Pending => {
                runtime::sleep(self.options.start_delay).await;
                info!("[{}] starting scene..", self.name);
                self.phase = ScenePhase::Running { ticks: 0 };
            }
            ScenePhase::Running { .. } => runtime::sleep(self.options.update_interval).await,
        }
        self.tick().await;
    }

    /// Plan, dispatch and log one tick at the current time.
    pub async fn tick(&mut self) -> TickReport {
        let plan = self.plan_tick(Instant::now());
        for planned in plan.commands.iter().filter(|c| c.flash) {
            info!("[{}] {} flashed", self.name, planned.target.name());
        }

        let report = self.dispatch(&plan).await;
        if !report.is_ok() {
            let causes: Vec<String> = report.failed.iter().map(ToString::to_string).collect();
            error!(
                "[{}] encountered error updating lights, are the lights off? - error={}",
                self.name,
                causes.join("; ")
            );
            self.stats.failed_ticks += 1;
        }

        self.stats.ticks += 1;
        self.stats.commands += plan.commands.len() as u64;
        self.stats.failures += report.failed.len() as u64;
        self.stats.flashes += plan.flashes() as u64;
        self.phase = ScenePhase::Running {
            ticks: self.stats.ticks,
        };
        report
    }

    /// Decide the next state of every light as of `now`.
    ///
    /// Each tick first advances the scene's lead state. Synchronized scenes
    /// apply it to every light; otherwise each light draws its own state in
    /// turn, all checked for repeats against the one shared last color.
    ///
    /// A light flashes when its coin flip succeeds while the flash gate is
    /// open. The gate opens once more than `flash_interval` has passed since
    /// it last opened, and closes again for every light at the end of the
    /// tick. A scene without a start delay starts its cooldown at
    /// construction; a delayed scene has its gate open on the first tick.
    pub fn plan_tick(&mut self, now: Instant) -> TickPlan {
        let flash_gate_open = self.flash_gate_open(now);
        let lead = self
            .sampler
            .sample_state(&self.palette, &mut self.last_color, self.gamut);

        let mut commands = Vec::with_capacity(self.lights.len());
        for target in &self.lights {
            let state = if self.options.synchronized {
                lead
            } else {
                self.sampler
                    .sample_state(&self.palette, &mut self.last_color, self.gamut)
            };

            let flash = self.sampler.coin_flip() && flash_gate_open;
            let command = if flash {
                LightCommand::from_state(&state)
                    .with_color_temperature(state.color_temperature())
                    .with_transition(Some(TransitionTime::FLASH))
            } else {
                LightCommand::from_state(&state).with_transition(self.options.transition)
            };

            debug!(
                "[{}] updating {} to: brightness={}, rgb={}",
                self.name,
                target.name(),
                state.brightness().value(),
                state.color()
            );
            commands.push(PlannedCommand {
                target: target.clone(),
                state,
                command,
                flash,
            });
        }

        if flash_gate_open {
            self.last_flash = Some(now);
        }

        TickPlan {
            at: now,
            commands,
            flash_gate_open,
        }
    }

    /// Send every planned command concurrently and collect each outcome.
    pub async fn dispatch(&self, plan: &TickPlan) -> TickReport {
        let outcomes = join_all(plan.commands.iter().map(|planned| self.send(planned))).await;

        let mut report = TickReport::default();
        for (planned, outcome) in plan.commands.iter().zip(outcomes) {
            match outcome {
                Ok(()) => report.succeeded.push(planned.target.id().clone()),
                Err(e) => report.failed.push(e),
            }
        }
        report
    }

    async fn send(&self, planned: &PlannedCommand) -> Result<()> {
        let id = planned.target.id();
        let request = self.gateway.set_light_state(id, &planned.command);
        match self.options.dispatch_timeout {
            Some(limit) => runtime::timeout(limit, request)
                .await
                .map_err(|_| Error::dispatch_timeout(id, limit))?,
            None => request.await,
        }
    }

    fn flash_gate_open(&self, now: Instant) -> bool {
        self.options
            .flash_interval
            .is_some_and(|interval| match self.last_flash {
                Some(last) => now.duration_since(last) > interval,
                None => true,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;

    use crate::types::{Brightness, Mired};

    #[derive(Default)]
    struct FakeGateway {
        calls: Mutex<Vec<(LightId, LightCommand)>>,
        failing: HashSet<LightId>,
        delay: Option<Duration>,
    }

    impl FakeGateway {
        fn failing(ids: &[&str]) -> Self {
            FakeGateway {
                failing: ids.iter().map(|id| LightId::from(*id)).collect(),
                ..Self::default()
            }
        }

        fn delayed(delay: Duration) -> Self {
            FakeGateway {
                delay: Some(delay),
                ..Self::default()
            }
        }

        fn calls(&self) -> Vec<(LightId, LightCommand)> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl BridgeGateway for FakeGateway {
        async fn discover_lights(&self) -> Result<Vec<LightTarget>> {
            Ok(Vec::new())
        }

        async fn set_light_state(&self, id: &LightId, command: &LightCommand) -> Result<()> {
            if let Some(delay) = self.delay {
                runtime::sleep(delay).await;
            }
            self.calls.lock().unwrap().push((id.clone(), *command));
            if self.failing.contains(id) {
                return Err(Error::dispatch(id, "light unreachable"));
            }
            Ok(())
        }
    }

    const RED: Color = Color::rgb(255, 0, 0);
    const BLUE: Color = Color::rgb(0, 0, 255);

    fn lights(count: usize) -> Vec<LightTarget> {
        (1..=count)
            .map(|i| LightTarget::new(format!("L{i}"), &format!("Light {i}")))
            .collect()
    }

    fn palette() -> ColorPalette {
        ColorPalette::new(vec![RED, BLUE, Color::rgb(0, 255, 0)]).unwrap()
    }

    fn scene(
        gateway: FakeGateway,
        lights: Vec<LightTarget>,
        options: SceneOptions,
    ) -> (Arc<FakeGateway>, Scene<FakeGateway>) {
        let gateway = Arc::new(gateway);
        let scene = Scene::new(
            "test",
            Arc::clone(&gateway),
            Gamut::A,
            lights,
            palette(),
            SceneOptions {
                seed: Some(11),
                ..options
            },
        )
        .unwrap();
        (gateway, scene)
    }

    #[test]
    fn test_rejects_zero_update_interval() {
        let result = Scene::new(
            "busy",
            Arc::new(FakeGateway::default()),
            Gamut::A,
            lights(1),
            palette(),
            SceneOptions {
                update_interval: Duration::ZERO,
                ..SceneOptions::default()
            },
        );
        assert_eq!(result.err(), Some(Error::ZeroUpdateInterval("busy".into())));
    }

    #[test]
    fn test_starts_pending_from_first_color() {
        let (_, scene) = scene(FakeGateway::default(), lights(2), SceneOptions::default());
        assert_eq!(scene.phase(), ScenePhase::Pending);
        assert_eq!(scene.last_color(), RED);
        assert_eq!(scene.stats(), SceneStats::default());
    }

    #[test]
    fn test_synchronized_tick_shares_state() {
        let options = SceneOptions {
            synchronized: true,
            transition: Some(TransitionTime::from_ticks(10_000)),
            ..SceneOptions::default()
        };
        let (_, mut scene) = scene(FakeGateway::default(), lights(4), options);

        for _ in 0..10 {
            let plan = scene.plan_tick(Instant::now());
            assert_eq!(plan.commands.len(), 4);

            let first = &plan.commands[0];
            assert!(plan.commands.iter().all(|c| c.state == first.state));
            assert!(plan.commands.iter().all(|c| c.command == first.command));
            assert_eq!(first.command.transition, Some(TransitionTime::from_ticks(10_000)));

            let ids: HashSet<&LightId> = plan.commands.iter().map(|c| c.target.id()).collect();
            assert_eq!(ids.len(), 4);
            assert_eq!(scene.last_color(), first.state.color());
        }
    }

    #[test]
    fn test_unsynchronized_tick_samples_each_light() {
        let (_, mut scene) = scene(FakeGateway::default(), lights(3), SceneOptions::default());

        let mut saw_divergent_brightness = false;
        for _ in 0..20 {
            let plan = scene.plan_tick(Instant::now());
            assert_eq!(plan.commands.len(), 3);
            for pair in plan.commands.windows(2) {
                // Repeats are checked against the shared last color
                assert_ne!(pair[0].state.color(), pair[1].state.color());
            }
            for planned in &plan.commands {
                assert!(scene.palette().contains(&planned.state.color()));
                assert!(planned.state.brightness() <= Brightness::create(100).unwrap());
                assert_eq!(
                    planned.command.color_point,
                    Some(Gamut::A.rgb_to_xy(planned.state.color()))
                );
            }
            let brightness: HashSet<u8> =
                plan.commands.iter().map(|c| c.state.brightness().value()).collect();
            saw_divergent_brightness |= brightness.len() > 1;
        }
        assert!(saw_divergent_brightness);
    }

    #[test]
    fn test_no_flash_interval_never_flashes() {
        let (_, mut scene) = scene(FakeGateway::default(), lights(8), SceneOptions::default());
        let start = Instant::now();
        for second in 0..600 {
            let plan = scene.plan_tick(start + Duration::from_secs(second));
            assert!(!plan.flash_gate_open);
            assert_eq!(plan.flashes(), 0);
            assert!(plan.commands.iter().all(|c| c.command.color_temperature.is_none()));
        }
    }

    #[test]
    fn test_flash_cooldown() {
        let options = SceneOptions {
            flash_interval: Some(Duration::from_secs(60)),
            transition: Some(TransitionTime::from_ticks(1000)),
            ..SceneOptions::default()
        };
        let (_, mut scene) = scene(FakeGateway::default(), lights(8), options);
        let start = Instant::now();

        let mut gate_ticks = Vec::new();
        for second in 0..200 {
            let now = start + Duration::from_secs(second);
            let plan = scene.plan_tick(now);

            if plan.flash_gate_open {
                gate_ticks.push(second);
            } else {
                assert_eq!(plan.flashes(), 0, "flash at {second}s with the gate closed");
            }

            for planned in &plan.commands {
                if planned.flash {
                    assert_eq!(planned.command.transition, Some(TransitionTime::FLASH));
                    assert_eq!(
                        planned.command.color_temperature,
                        Some(Mired::from_kelvin(3000))
                    );
                } else {
                    assert_eq!(planned.command.transition, Some(TransitionTime::from_ticks(1000)));
                    assert_eq!(planned.command.color_temperature, None);
                }
            }
        }

        // The cooldown restarts from every opened gate, flash or not
        assert_eq!(gate_ticks.len(), 3, "gate opened at {gate_ticks:?}");
        for pair in gate_ticks.windows(2) {
            assert_eq!(pair[1] - pair[0], 61);
        }
    }

    #[test]
    fn test_first_tick_gate_depends_on_start_delay() {
        let flash = SceneOptions {
            flash_interval: Some(Duration::from_secs(60)),
            ..SceneOptions::default()
        };
        let delayed = SceneOptions {
            start_delay: Duration::from_secs(20),
            ..flash.clone()
        };

        let (_, mut immediate) = scene(FakeGateway::default(), lights(6), flash);
        let start = Instant::now();
        assert!(!immediate.plan_tick(start).flash_gate_open);
        assert!(!immediate.plan_tick(start + Duration::from_secs(30)).flash_gate_open);

        let (_, mut spider) = scene(FakeGateway::default(), lights(6), delayed);
        let start = Instant::now() + Duration::from_secs(20);
        assert!(spider.plan_tick(start).flash_gate_open);
        // The cooldown then runs from that first tick
        assert!(!spider.plan_tick(start + Duration::from_secs(60)).flash_gate_open);
        assert!(spider.plan_tick(start + Duration::from_secs(61)).flash_gate_open);
    }

    #[test]
    fn test_flash_gate_opens_for_some_lights() {
        let options = SceneOptions {
            flash_interval: Some(Duration::from_secs(1)),
            ..SceneOptions::default()
        };
        let (_, mut scene) = scene(FakeGateway::default(), lights(8), options);
        let start = Instant::now();

        let mut flashes = 0;
        let mut total = 0;
        for second in 0..50 {
            let plan = scene.plan_tick(start + Duration::from_secs(second * 2 + 2));
            assert!(plan.flash_gate_open);
            flashes += plan.flashes();
            total += plan.commands.len();
        }
        // Each light flips its own coin
        assert!(flashes > total / 4 && flashes < total * 3 / 4, "{flashes}/{total}");
    }

    #[tokio::test]
    async fn test_dispatch_failure_is_isolated() {
        let (gateway, mut scene) = scene(
            FakeGateway::failing(&["L1"]),
            lights(2),
            SceneOptions::default(),
        );

        let report = scene.tick().await;
        assert_eq!(report.succeeded, vec![LightId::from("L2")]);
        assert_eq!(report.failed, vec![Error::dispatch(&"L1".into(), "light unreachable")]);

        let report = scene.tick().await;
        assert_eq!(report.succeeded.len(), 1);

        let calls = gateway.calls();
        assert_eq!(calls.len(), 4);
        assert_eq!(calls.iter().filter(|(id, _)| id.as_str() == "L2").count(), 2);

        let stats = scene.stats();
        assert_eq!(stats.ticks, 2);
        assert_eq!(stats.commands, 4);
        assert_eq!(stats.failures, 2);
        assert_eq!(stats.failed_ticks, 2);
        assert_eq!(scene.phase(), ScenePhase::Running { ticks: 2 });
    }

    #[tokio::test]
    async fn test_dispatch_is_concurrent() {
        let delay = Duration::from_millis(200);
        let (gateway, mut scene) = scene(
            FakeGateway::delayed(delay),
            lights(5),
            SceneOptions::default(),
        );

        let started = Instant::now();
        let report = scene.tick().await;
        let elapsed = started.elapsed();

        assert!(report.is_ok());
        assert_eq!(gateway.calls().len(), 5);
        assert!(elapsed >= delay);
        assert!(elapsed < delay * 4, "tick took {elapsed:?}");
    }

    #[tokio::test]
    async fn test_dispatch_timeout_fails_slow_lights() {
        let options = SceneOptions {
            dispatch_timeout: Some(Duration::from_millis(20)),
            ..SceneOptions::default()
        };
        let (_, mut scene) = scene(
            FakeGateway::delayed(Duration::from_secs(5)),
            lights(2),
            options,
        );

        let started = Instant::now();
        let report = scene.tick().await;
        assert!(started.elapsed() < Duration::from_secs(1));
        assert_eq!(
            report.failed,
            vec![
                Error::dispatch_timeout(&"L1".into(), Duration::from_millis(20)),
                Error::dispatch_timeout(&"L2".into(), Duration::from_millis(20)),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_scene_keeps_ticking() {
        let (gateway, mut scene) =
            scene(FakeGateway::default(), Vec::new(), SceneOptions::default());
        let report = scene.tick().await;
        assert!(report.is_ok());
        assert!(report.succeeded.is_empty());
        assert!(gateway.calls().is_empty());
        assert_eq!(scene.stats().ticks, 1);
    }

    #[tokio::test]
    async fn test_two_color_scene_runs_five_ticks() {
        let gateway = Arc::new(FakeGateway::default());
        let mut scene = Scene::new(
            "two-tone",
            Arc::clone(&gateway),
            Gamut::A,
            vec![LightTarget::new("L1", "L1"), LightTarget::new("L2", "L2")],
            ColorPalette::new(vec![RED, BLUE]).unwrap(),
            SceneOptions {
                update_interval: Duration::from_millis(10),
                ..SceneOptions::default()
            },
        )
        .unwrap();

        scene.run_ticks(5).await;

        let calls = gateway.calls();
        assert_eq!(calls.len(), 10);
        assert_eq!(scene.phase(), ScenePhase::Running { ticks: 5 });

        let red = Gamut::A.rgb_to_xy(RED);
        let blue = Gamut::A.rgb_to_xy(BLUE);
        for light in ["L1", "L2"] {
            let points: Vec<_> = calls
                .iter()
                .filter(|(id, _)| id.as_str() == light)
                .map(|(_, command)| {
                    assert!(command.on);
                    assert!(command.brightness.is_some_and(|b| b.value() <= 100));
                    command.color_point.unwrap()
                })
                .collect();
            assert_eq!(points.len(), 5);
            assert!(points.iter().all(|p| *p == red || *p == blue));
            for pair in points.windows(2) {
                assert_ne!(pair[0], pair[1], "{light} repeated a color");
            }
        }
    }

    #[tokio::test]
    async fn test_start_delay_is_waited_once() {
        let options = SceneOptions {
            start_delay: Duration::from_millis(50),
            update_interval: Duration::from_millis(5),
            ..SceneOptions::default()
        };
        let (gateway, mut scene) = scene(FakeGateway::default(), lights(1), options);

        let started = Instant::now();
        scene.run_ticks(1).await;
        assert!(started.elapsed() >= Duration::from_millis(50));
        assert_eq!(gateway.calls().len(), 1);

        let resumed = Instant::now();
        scene.run_ticks(2).await;
        assert!(resumed.elapsed() < Duration::from_millis(50));
        assert_eq!(scene.stats().ticks, 3);
    }
}
