//! Debounced render scheduling with per-surface generations.
//!
//! Each surface (inline preview, full-screen preview) has a slot holding a
//! generation counter, at most one pending deadline, and the SVG currently
//! on display.
//!
//! - **Schedule**: a text change bumps the surface's generation and sets its
//!   deadline to `now + debounce`. A pending render that has not started yet
//!   is replaced outright, so it never reaches the renderer.
//! - **Take**: once the deadline passes, `take_due` turns the pending slot
//!   into a [`RenderJob`] stamped with the generation it was scheduled under.
//! - **Finish**: a completed job is applied only if its generation is still
//!   the surface's latest and the surface is still open. Anything else is
//!   discarded, which keeps late results from painting over newer ones or
//!   over a closed dialog.
//!
//! Time is passed in by the host as milliseconds (`performance.now()` in the
//! browser), keeping the pipeline free of any timer or runtime dependency.

use mmd_render::{DiagramRenderer, RenderConfig, RenderError, Surface};

/// A render ready to run.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderJob {
    pub surface: Surface,
    pub generation: u64,
    pub source: String,
    pub config: RenderConfig,
}

impl RenderJob {
    /// Run this job through a renderer.
    pub async fn run<R: DiagramRenderer + ?Sized>(&self, renderer: &R) -> Result<String, RenderError> {
        renderer
            .render(self.surface, &self.source, &self.config)
            .await
    }
}

/// What happened to a finished job.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutcome {
    /// The SVG is now on display.
    Applied,
    /// The renderer rejected the source; the previous SVG stays.
    Failed(RenderError),
    /// A newer render was scheduled meanwhile; result dropped.
    Stale,
    /// The surface closed meanwhile; result dropped.
    Closed,
}

/// The SVG currently shown on a surface, tagged with its inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayedSvg {
    pub svg: String,
    pub source: String,
    pub generation: u64,
}

#[derive(Debug, Clone, Default)]
struct SurfaceSlot {
    open: bool,
    generation: u64,
    /// Deadline of the pending render, if one is scheduled.
    due_ms: Option<f64>,
    /// Generation of the job handed out and not yet finished.
    in_flight: Option<u64>,
    displayed: Option<DisplayedSvg>,
    last_error: Option<RenderError>,
}

pub struct RenderPipeline {
    debounce_ms: f64,
    slots: [SurfaceSlot; 2],
}

impl RenderPipeline {
    /// The inline surface starts open; the full-screen surface starts closed.
    pub fn new(debounce_ms: f64) -> Self {
        let mut slots: [SurfaceSlot; 2] = Default::default();
        slots[Surface::Inline.index()].open = true;
        Self { debounce_ms, slots }
    }

    pub fn debounce_ms(&self) -> f64 {
        self.debounce_ms
    }

    fn slot(&self, surface: Surface) -> &SurfaceSlot {
        &self.slots[surface.index()]
    }

    fn slot_mut(&mut self, surface: Surface) -> &mut SurfaceSlot {
        &mut self.slots[surface.index()]
    }

    pub fn is_open(&self, surface: Surface) -> bool {
        self.slot(surface).open
    }

    pub fn generation(&self, surface: Surface) -> u64 {
        self.slot(surface).generation
    }

    pub fn is_pending(&self, surface: Surface) -> bool {
        self.slot(surface).due_ms.is_some()
    }

    pub fn in_flight(&self, surface: Surface) -> Option<u64> {
        self.slot(surface).in_flight
    }

    pub fn displayed(&self, surface: Surface) -> Option<&DisplayedSvg> {
        self.slot(surface).displayed.as_ref()
    }

    pub fn last_error(&self, surface: Surface) -> Option<&RenderError> {
        self.slot(surface).last_error.as_ref()
    }

    /// Schedule a debounced render. Ignored for closed surfaces.
    pub fn schedule(&mut self, surface: Surface, now_ms: f64) {
        let due = now_ms + self.debounce_ms;
        self.schedule_at(surface, due);
    }

    /// Schedule a render that is due immediately.
    pub fn schedule_now(&mut self, surface: Surface, now_ms: f64) {
        self.schedule_at(surface, now_ms);
    }

    /// Debounced render on every open surface.
    pub fn schedule_open(&mut self, now_ms: f64) {
        for surface in Surface::ALL {
            self.schedule(surface, now_ms);
        }
    }

    fn schedule_at(&mut self, surface: Surface, due_ms: f64) {
        let slot = self.slot_mut(surface);
        if !slot.open {
            return;
        }
        if slot.due_ms.is_some() {
            log::debug!(
                "render[{surface}]: generation {} superseded before start",
                slot.generation
            );
        }
        slot.generation += 1;
        slot.due_ms = Some(due_ms);
    }

    /// Earliest pending deadline, for hosts that arm a single timer.
    pub fn next_deadline(&self) -> Option<f64> {
        self.slots
            .iter()
            .filter_map(|s| s.due_ms)
            .min_by(|a, b| a.total_cmp(b))
    }

    /// Hand out every render whose deadline has passed.
    pub fn take_due(&mut self, now_ms: f64, source: &str, config: RenderConfig) -> Vec<RenderJob> {
        let mut jobs = Vec::new();
        for surface in Surface::ALL {
            let slot = self.slot_mut(surface);
            match slot.due_ms {
                Some(due) if due <= now_ms => {
                    slot.due_ms = None;
                    slot.in_flight = Some(slot.generation);
                    log::debug!("render[{surface}]: starting generation {}", slot.generation);
                    jobs.push(RenderJob {
                        surface,
                        generation: slot.generation,
                        source: source.to_string(),
                        config,
                    });
                }
                _ => {}
            }
        }
        jobs
    }

    /// Record the result of a job handed out by `take_due`.
    pub fn finish(
        &mut self,
        surface: Surface,
        generation: u64,
        source: &str,
        result: Result<String, RenderError>,
    ) -> RenderOutcome {
        let slot = self.slot_mut(surface);
        if slot.in_flight == Some(generation) {
            slot.in_flight = None;
        }
        if !slot.open {
            log::debug!("render[{surface}]: generation {generation} arrived after close");
            return RenderOutcome::Closed;
        }
        if generation != slot.generation {
            log::debug!(
                "render[{surface}]: generation {generation} is stale (latest {})",
                slot.generation
            );
            return RenderOutcome::Stale;
        }
        match result {
            Ok(svg) => {
                slot.displayed = Some(DisplayedSvg {
                    svg,
                    source: source.to_string(),
                    generation,
                });
                slot.last_error = None;
                RenderOutcome::Applied
            }
            Err(err) => {
                slot.last_error = Some(err.clone());
                RenderOutcome::Failed(err)
            }
        }
    }

    /// Open a surface and schedule its first render immediately.
    pub fn open(&mut self, surface: Surface, now_ms: f64) {
        self.slot_mut(surface).open = true;
        self.schedule_now(surface, now_ms);
    }

    /// Close a surface: drop its pending render and its display, and
    /// invalidate whatever is still in flight.
    pub fn close(&mut self, surface: Surface) {
        let slot = self.slot_mut(surface);
        slot.open = false;
        slot.due_ms = None;
        slot.generation += 1;
        slot.displayed = None;
        slot.last_error = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pipeline() -> RenderPipeline {
        RenderPipeline::new(100.0)
    }

    #[test]
    fn nothing_due_before_debounce() {
        let mut p = pipeline();
        p.schedule(Surface::Inline, 0.0);
        assert!(p.take_due(99.0, "graph LR", RenderConfig::default()).is_empty());
        let jobs = p.take_due(100.0, "graph LR", RenderConfig::default());
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].surface, Surface::Inline);
        assert!(!p.is_pending(Surface::Inline));
    }

    #[test]
    fn rapid_changes_coalesce_into_one_job() {
        let mut p = pipeline();
        for t in 0..5 {
            p.schedule(Surface::Inline, t as f64 * 20.0);
        }
        assert!(p.take_due(150.0, "x", RenderConfig::default()).is_empty());
        let jobs = p.take_due(180.0, "x", RenderConfig::default());
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].generation, 5);
    }

    #[test]
    fn closed_surface_is_not_scheduled() {
        let mut p = pipeline();
        p.schedule(Surface::FullScreen, 0.0);
        assert!(!p.is_pending(Surface::FullScreen));
        assert_eq!(p.generation(Surface::FullScreen), 0);
    }

    #[test]
    fn stale_result_is_discarded() {
        let mut p = pipeline();
        p.schedule_now(Surface::Inline, 0.0);
        let job = p.take_due(0.0, "old", RenderConfig::default()).remove(0);
        p.schedule(Surface::Inline, 10.0);

        let outcome = p.finish(job.surface, job.generation, &job.source, Ok("<svg/>".into()));
        assert_eq!(outcome, RenderOutcome::Stale);
        assert!(p.displayed(Surface::Inline).is_none());
        assert_eq!(p.in_flight(Surface::Inline), None);
    }

    #[test]
    fn failure_keeps_previous_svg() {
        let mut p = pipeline();
        p.schedule_now(Surface::Inline, 0.0);
        let job = p.take_due(0.0, "graph LR", RenderConfig::default()).remove(0);
        p.finish(job.surface, job.generation, &job.source, Ok("<svg>ok</svg>".into()));

        p.schedule(Surface::Inline, 1.0);
        let job = p.take_due(101.0, "graph LR\n A --", RenderConfig::default()).remove(0);
        let outcome = p.finish(
            job.surface,
            job.generation,
            &job.source,
            Err(RenderError::Syntax("bad".into())),
        );
        assert!(matches!(outcome, RenderOutcome::Failed(_)));
        assert_eq!(p.displayed(Surface::Inline).unwrap().svg, "<svg>ok</svg>");
        assert!(p.last_error(Surface::Inline).is_some());
    }

    #[test]
    fn open_renders_immediately_and_close_discards() {
        let mut p = pipeline();
        p.open(Surface::FullScreen, 50.0);
        let jobs = p.take_due(50.0, "graph TB", RenderConfig::default());
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].surface, Surface::FullScreen);

        p.close(Surface::FullScreen);
        let job = &jobs[0];
        let outcome = p.finish(job.surface, job.generation, &job.source, Ok("<svg/>".into()));
        assert_eq!(outcome, RenderOutcome::Closed);
        assert!(p.displayed(Surface::FullScreen).is_none());
    }

    #[test]
    fn surfaces_are_independent() {
        let mut p = pipeline();
        p.open(Surface::FullScreen, 0.0);
        p.schedule(Surface::Inline, 0.0);
        let jobs = p.take_due(0.0, "s", RenderConfig::default());
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].surface, Surface::FullScreen);

        // scheduling the inline surface does not invalidate the full-screen job
        p.schedule(Surface::Inline, 10.0);
        let outcome = p.finish(Surface::FullScreen, jobs[0].generation, "s", Ok("<svg/>".into()));
        assert_eq!(outcome, RenderOutcome::Applied);
    }

    #[test]
    fn next_deadline_is_earliest() {
        let mut p = pipeline();
        assert_eq!(p.next_deadline(), None);
        p.open(Surface::FullScreen, 30.0);
        p.schedule(Surface::Inline, 0.0);
        assert_eq!(p.next_deadline(), Some(30.0));
    }
}
