//! Scripted scroll replay
//!
//! Mounts the landing page on a headless host, scrolls down at a fixed
//! speed, holds at the bottom, optionally scrolls back up, and records
//! what the motion layer produced along the way.

use std::time::Duration;

use anyhow::Result;
use serde::Serialize;
use unfold_core::ElementId;
use unfold_motion::{Direction, HeadlessHost, MotionContext, RevealEntry, RevealPhase, RevealStyle};

use crate::config::UnfoldConfig;
use crate::page::{LandingPage, PageLayout};

/// Upper bound on frames spent settling after the script ends
const SETTLE_LIMIT: Duration = Duration::from_secs(10);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    ScrollDown,
    Hold,
    ScrollUp,
    Settle,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LabeledReveal {
    pub label: String,
    pub phase: RevealPhase,
    pub style: RevealStyle,
}

/// One sampled frame
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameRecord {
    pub frame: u64,
    pub time_ms: u64,
    pub phase: Phase,
    pub scroll_y: f32,
    pub progress_target: f32,
    pub progress_scale_x: f32,
    pub revealed: usize,
    pub animating: usize,
    pub parallax_offset_percent: Option<f32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reveals: Vec<LabeledReveal>,
}

/// When each block was revealed
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RevealRecord {
    pub label: String,
    pub direction: Direction,
    pub delay_ms: u32,
    pub revealed_at_ms: Option<u64>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReplayReport {
    pub frames: Vec<FrameRecord>,
    pub reveals: Vec<RevealRecord>,
    pub total_frames: u64,
    pub final_progress: f32,
}

impl ReplayReport {
    pub fn reveal(&self, label: &str) -> Option<&RevealRecord> {
        self.reveals.iter().find(|r| r.label == label)
    }
}

/// Options that do not live in the config file
#[derive(Clone, Copy, Debug, Default)]
pub struct ReplayOptions {
    /// Stop after this many frames
    pub max_frames: Option<u64>,
    /// Include per-block styles in sampled frames
    pub detailed: bool,
}

pub struct Replay {
    config: UnfoldConfig,
    layout: PageLayout,
}

impl Replay {
    pub fn new(config: UnfoldConfig) -> Self {
        let layout = LandingPage::layout(config.viewport.size());
        Self { config, layout }
    }

    pub fn layout(&self) -> &PageLayout {
        &self.layout
    }

    pub fn run(&self, options: ReplayOptions) -> Result<ReplayReport> {
        let sim = &self.config.simulation;
        let fps = sim.fps.max(1);
        let dt = Duration::from_secs_f64(1.0 / f64::from(fps));
        let step = sim.scroll_speed / fps as f32;
        let hold_frames = sim.hold_ms * u64::from(fps) / 1000;
        let settle_frames = SETTLE_LIMIT.as_secs() * u64::from(fps);
        let sample_every = u64::from(sim.sample_every.max(1));

        let host = HeadlessHost::new(self.layout.viewport);
        host.set_document_height(self.layout.document_height);

        let mut motion = MotionContext::with_config(
            host.visibility(),
            host.scroll(),
            self.config.motion_config()?,
        );

        let mut labels: Vec<(ElementId, usize)> = Vec::with_capacity(self.layout.blocks.len());
        let mut reveals: Vec<RevealRecord> = Vec::with_capacity(self.layout.blocks.len());
        for (index, block) in self.layout.blocks.iter().enumerate() {
            let id = host.insert(block.rect);
            let entry = RevealEntry::new(id)
                .direction(block.direction)
                .delay_ms(block.delay_ms);
            motion.observe_reveal(entry);
            if block.parallax {
                motion.bind_parallax(Some(id), block.rect);
            }
            labels.push((id, index));
            reveals.push(RevealRecord {
                label: block.label.clone(),
                direction: block.direction,
                delay_ms: block.delay_ms,
                revealed_at_ms: None,
            });
        }
        let label_of = |element: ElementId| {
            labels
                .iter()
                .find(|(id, _)| *id == element)
                .map(|(_, index)| *index)
        };

        tracing::info!(
            "Replaying {} blocks over a {:.0}px document in a {}x{} viewport",
            self.layout.blocks.len(),
            self.layout.document_height,
            self.layout.viewport.width,
            self.layout.viewport.height
        );

        let mut frames = Vec::new();
        let mut phase = Phase::ScrollDown;
        let mut phase_frames = 0_u64;
        let mut frame = 0_u64;

        loop {
            if options.max_frames.is_some_and(|max| frame >= max) {
                tracing::debug!("Stopping at frame limit {}", frame);
                break;
            }

            let max_scroll = host.metrics().max_scroll();
            let scroll_y = host.metrics().scroll_y;
            let next = match phase {
                Phase::ScrollDown if scroll_y >= max_scroll => Some(Phase::Hold),
                Phase::Hold if phase_frames >= hold_frames => Some(if sim.scroll_back {
                    Phase::ScrollUp
                } else {
                    Phase::Settle
                }),
                Phase::ScrollUp if scroll_y <= 0.0 => Some(Phase::Settle),
                Phase::Settle if !motion.is_animating() || phase_frames >= settle_frames => break,
                _ => None,
            };
            if let Some(next) = next {
                tracing::debug!("Frame {}: {:?} -> {:?}", frame, phase, next);
                phase = next;
                phase_frames = 0;
            }

            let time_ms = frame * 1000 / u64::from(fps);
            let report = motion.pump();
            for element in report.revealed {
                if let Some(index) = label_of(element) {
                    let record = &mut reveals[index];
                    record.revealed_at_ms = Some(time_ms);
                    tracing::info!(
                        "{:>6}ms  revealed {} ({:?}, +{}ms)",
                        time_ms,
                        record.label,
                        record.direction,
                        record.delay_ms
                    );
                }
            }
            motion.tick(dt);

            if frame % sample_every == 0 {
                let record =
                    self.sample(&motion, frame, time_ms, phase, options.detailed, &label_of);
                frames.push(record);
            }

            // Scroll lands at the end of the frame so frame 0 shows the page at rest
            match phase {
                Phase::ScrollDown => host.scroll_by(step),
                Phase::ScrollUp => host.scroll_by(-step),
                Phase::Hold | Phase::Settle => {}
            }

            frame += 1;
            phase_frames += 1;
        }

        let final_progress = motion.progress().smoothed();
        motion.teardown();

        Ok(ReplayReport {
            frames,
            reveals,
            total_frames: frame,
            final_progress,
        })
    }

    fn sample<V, S>(
        &self,
        motion: &MotionContext<V, S>,
        frame: u64,
        time_ms: u64,
        phase: Phase,
        detailed: bool,
        label_of: &dyn Fn(ElementId) -> Option<usize>,
    ) -> FrameRecord
    where
        V: unfold_motion::VisibilitySource,
        S: unfold_motion::ScrollSource,
    {
        let snapshot = motion.frame();
        let revealed = snapshot
            .reveals
            .iter()
            .filter(|r| r.phase == RevealPhase::Revealed)
            .count();
        let animating = snapshot
            .reveals
            .iter()
            .filter(|r| r.phase == RevealPhase::Revealed && r.style != RevealStyle::shown())
            .count();

        let reveals = if detailed {
            snapshot
                .reveals
                .iter()
                .filter_map(|r| {
                    label_of(r.element).map(|index| LabeledReveal {
                        label: self.layout.blocks[index].label.clone(),
                        phase: r.phase,
                        style: r.style,
                    })
                })
                .collect()
        } else {
            Vec::new()
        };

        FrameRecord {
            frame,
            time_ms,
            phase,
            scroll_y: motion.metrics().map(|m| m.scroll_y).unwrap_or(0.0),
            progress_target: snapshot.progress_target,
            progress_scale_x: snapshot.progress_scale_x,
            revealed,
            animating,
            parallax_offset_percent: snapshot.parallax.first().map(|p| p.offset_percent),
            reveals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_replay_reveals_every_block() {
        let report = Replay::new(UnfoldConfig::default())
            .run(ReplayOptions::default())
            .unwrap();

        for record in &report.reveals {
            assert!(record.revealed_at_ms.is_some(), "{} never revealed", record.label);
        }
        assert_eq!(report.reveal("hero.badge").unwrap().revealed_at_ms, Some(0));

        let contact = report.reveal("contact.cta").unwrap().revealed_at_ms.unwrap();
        assert!(contact > 0);
    }

    #[test]
    fn test_reveals_survive_scrolling_back() {
        let report = Replay::new(UnfoldConfig::default())
            .run(ReplayOptions {
                max_frames: None,
                detailed: true,
            })
            .unwrap();

        let last = report.frames.last().unwrap();
        assert_eq!(last.phase, Phase::Settle);
        assert!(last.reveals.iter().all(|r| r.phase == RevealPhase::Revealed));
        assert!(report.final_progress <= 0.001);

        // Revealed count never drops
        let counts: Vec<usize> = report.frames.iter().map(|f| f.revealed).collect();
        assert!(counts.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_frame_limit_stops_early() {
        let report = Replay::new(UnfoldConfig::default())
            .run(ReplayOptions {
                max_frames: Some(10),
                detailed: false,
            })
            .unwrap();

        assert_eq!(report.total_frames, 10);
        assert!(report.reveal("contact.cta").unwrap().revealed_at_ms.is_none());
        assert!(report.frames.iter().all(|f| f.reveals.is_empty()));
    }

    #[test]
    fn test_progress_and_parallax_move_with_scroll() {
        let mut config = UnfoldConfig::default();
        config.simulation.scroll_back = false;
        let report = Replay::new(config).run(ReplayOptions::default()).unwrap();

        let first = report.frames.first().unwrap();
        assert_eq!(first.frame, 0);
        assert_eq!(first.scroll_y, 0.0);
        assert_eq!(first.progress_target, 0.0);
        assert_eq!(first.progress_scale_x, 0.0);

        let hold = report
            .frames
            .iter()
            .find(|f| f.phase == Phase::Hold)
            .unwrap();
        assert_eq!(hold.progress_target, 1.0);
        // The hero image has scrolled past its exit point
        assert_eq!(hold.parallax_offset_percent, Some(10.0));
        assert!((report.final_progress - 1.0).abs() <= 0.001);
    }
}
