// Observer pipeline: runs registered observers ring by ring and stops at the first rejection.

use std::collections::HashMap;
use std::time::Instant;

use crate::observer::context::ObserverContext;
use crate::observer::error::ObserverError;
use crate::observer::implementations::*;
use crate::observer::traits::{Observer, ObserverRing};

pub type ObserverBox = Box<dyn Observer>;

/// Ordered registry of observers keyed by ring
pub struct ObserverPipeline {
    observers: HashMap<ObserverRing, Vec<ObserverBox>>,
}

impl ObserverPipeline {
    /// Create new observer pipeline with empty observer registry
    pub fn new() -> Self {
        Self {
            observers: HashMap::new(),
        }
    }

    /// Pipeline with every built-in observer registered
    pub fn with_default_observers() -> Self {
        let mut pipeline = Self::new();

        // Ring 0
        pipeline.register_observer(Box::new(DataPreparationObserver));
        // Ring 1
        pipeline.register_observer(Box::new(FieldRulesObserver));
        // Ring 2
        pipeline.register_observer(Box::new(ParentExistsObserver));
        pipeline.register_observer(Box::new(DeleteGuardObserver));
        // Ring 3
        pipeline.register_observer(Box::new(ScopedUniquenessObserver));
        // Ring 4
        pipeline.register_observer(Box::new(NegotiationConsistencyObserver));
        pipeline.register_observer(Box::new(MonitoringDefaultsObserver));
        // Ring 5
        pipeline.register_observer(Box::new(PersistObserver));

        pipeline
    }

    /// Register an observer, keeping each ring sorted by priority
    pub fn register_observer(&mut self, observer: ObserverBox) {
        let ring = observer.ring();
        let name = observer.name();
        let ring_observers = self.observers.entry(ring).or_default();
        ring_observers.push(observer);
        ring_observers.sort_by_key(|o| o.priority());

        tracing::debug!("Registered observer '{}' for ring {:?}", name, ring);
    }

    /// Run every applicable ring up to and including `through`.
    ///
    /// Stopping before `ObserverRing::Database` validates without writing.
    pub async fn execute(&self, ctx: &mut ObserverContext, through: ObserverRing) -> Result<(), ObserverError> {
        let rings: Vec<ObserverRing> = ObserverRing::for_operation(ctx.operation)
            .into_iter()
            .filter(|ring| *ring <= through)
            .collect();

        tracing::debug!(
            "Observer pipeline starting: operation={:?}, entity={}, rings={:?}",
            ctx.operation,
            ctx.entity,
            rings
        );

        for ring in rings {
            ctx.current_ring = Some(ring);
            self.execute_ring(ring, ctx).await?;
        }

        tracing::debug!(
            "Observer pipeline finished: operation={:?}, entity={} in {:?}",
            ctx.operation,
            ctx.entity,
            ctx.execution_time()
        );

        Ok(())
    }

    async fn execute_ring(&self, ring: ObserverRing, ctx: &mut ObserverContext) -> Result<(), ObserverError> {
        let Some(observers) = self.observers.get(&ring) else {
            tracing::debug!("No observers registered for ring {:?}", ring);
            return Ok(());
        };

        for observer in observers {
            if !observer.applies_to_operation(ctx.operation) {
                tracing::trace!(
                    "Observer {} skipped - doesn't apply to operation {:?}",
                    observer.name(),
                    ctx.operation
                );
                continue;
            }

            if !observer.applies_to_entity(ctx.entity) {
                tracing::trace!("Observer {} skipped - doesn't apply to {}", observer.name(), ctx.entity);
                continue;
            }

            let observer_start = Instant::now();
            match observer.execute(ctx).await {
                Ok(()) => {
                    tracing::debug!(
                        "Observer: {} completed successfully in {:?}",
                        observer.name(),
                        observer_start.elapsed()
                    );
                }
                Err(error) => {
                    tracing::warn!(
                        "Observer: {} rejected {:?} on {} in {:?}: {}",
                        observer.name(),
                        ctx.operation,
                        ctx.entity,
                        observer_start.elapsed(),
                        error
                    );
                    return Err(error);
                }
            }
        }

        Ok(())
    }
}

impl Default for ObserverPipeline {
    fn default() -> Self {
        Self::with_default_observers()
    }
}
