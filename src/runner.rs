//! Running many scenes side by side.

use std::future::Future;

use futures::future::{Either, join_all, select};
use log::info;

use crate::gateway::BridgeGateway;
use crate::runtime::{self, JoinHandle};
use crate::scene::Scene;

/// Starts every scene as its own task and supervises them as a group.
///
/// Scenes share nothing but the gateway, so one scene stalling on a slow
/// light never delays the others.
///
/// # Example
///
/// ```ignore
/// let mut runner = SceneRunner::new();
/// runner.push(horror);
/// runner.push(potions);
/// runner.run_until(async { tokio::signal::ctrl_c().await.ok(); }).await;
/// ```
pub struct SceneRunner<G> {
    scenes: Vec<Scene<G>>,
}

impl<G> Default for SceneRunner<G> {
    fn default() -> Self {
        SceneRunner { scenes: Vec::new() }
    }
}

impl<G: BridgeGateway + 'static> SceneRunner<G> {
    /// Create a new runner with no scenes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a scene to start with the others.
    pub fn push(&mut self, scene: Scene<G>) {
        self.scenes.push(scene);
    }

    /// Get the scenes that will be started.
    pub fn scenes(&self) -> &[Scene<G>] {
        &self.scenes
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// Run every scene until all of them end, which in practice is never.
    pub async fn run(self) {
        self.run_until(futures::future::pending::<()>()).await
    }

    /// Run every scene until `shutdown` resolves, then abort them all.
    ///
    /// Commands still in flight at that point are abandoned; lights keep
    /// whatever state they last reached.
    pub async fn run_until<F>(self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        info!("starting {} scene(s)", self.scenes.len());
        let mut handles: Vec<JoinHandle<()>> = self
            .scenes
            .into_iter()
            .map(|scene| runtime::spawn(scene.run()))
            .collect();

        let finished = {
            let all = join_all(handles.iter_mut());
            futures::pin_mut!(all);
            futures::pin_mut!(shutdown);
            matches!(select(all, shutdown).await, Either::Left(_))
        };

        if finished {
            info!("all scenes finished");
            return;
        }

        info!("shutting down {} scene(s)", handles.len());
        for handle in handles {
            handle.abort();
        }
    }
}
