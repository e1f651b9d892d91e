use crate::{curve::Curve, parse::PathType, Beatmap, Pos2};

use super::{convert::ObjectCount, PLAYFIELD_WIDTH};

const BASE_SCORING_DIST: f64 = 100.0;
const LEGACY_LAST_TICK_OFFSET: f64 = 36.0;

// * A very lenient maximum length of a slider for ticks to be generated.
const MAX_LEN: f64 = 100_000.0;

/// Slider converted into fruits, droplets, and tiny droplets.
pub(crate) struct JuiceStream {
    /// Unclamped x-coordinate of the last control point.
    pub(crate) path_end_x: f32,
    pub(crate) nested_objects: Vec<NestedJuiceObject>,
}

#[derive(Copy, Clone, Debug)]
pub(crate) struct NestedJuiceObject {
    pub(crate) x: f32,
    pub(crate) start_time: f64,
    pub(crate) kind: NestedJuiceKind,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum NestedJuiceKind {
    Fruit,
    Droplet,
    TinyDroplet,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum SliderEventKind {
    Head,
    Tick,
    Repeat,
    LegacyLastTick,
    Tail,
}

#[derive(Copy, Clone, Debug)]
struct SliderEvent {
    kind: SliderEventKind,
    time: f64,
    path_progress: f64,
}

impl JuiceStream {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        pos: Pos2,
        start_time: f64,
        pixel_len: f64,
        repeats: usize,
        curve_points: &[Pos2],
        path_type: PathType,
        map: &Beatmap,
        count: &mut ObjectCount,
    ) -> Self {
        let curve = Curve::new(curve_points, path_type, pixel_len);

        let beat_len = map.timing_point_at(start_time).beat_len;
        let slider_vel = map.difficulty_point_at(start_time).slider_vel;

        let scoring_dist = BASE_SCORING_DIST * map.slider_mult * slider_vel;
        let velocity = scoring_dist / beat_len;
        let tick_dist = scoring_dist / map.tick_rate;

        let span_count = repeats + 1;
        let span_duration = curve.dist() / velocity;

        let events = slider_events(
            start_time,
            span_duration,
            velocity,
            tick_dist,
            curve.dist(),
            span_count,
        );

        let head_x = pos.x.clamp(0.0, PLAYFIELD_WIDTH);
        let mut nested_objects = Vec::with_capacity(events.len() * 2);
        let mut last_event_time: Option<f64> = None;

        for e in events {
            if let Some(last_event_time) = last_event_time {
                let since_last_tick = e.time - last_event_time;

                if since_last_tick > 80.0 {
                    let mut time_between_tiny = since_last_tick;

                    while time_between_tiny > 100.0 {
                        time_between_tiny /= 2.0;
                    }

                    let mut t = time_between_tiny;
                    let mut tiny_droplets = 0;

                    while t < since_last_tick {
                        tiny_droplets += 1;

                        nested_objects.push(NestedJuiceObject {
                            x: 0.0,
                            start_time: last_event_time + t,
                            kind: NestedJuiceKind::TinyDroplet,
                        });

                        t += time_between_tiny;
                    }

                    count.record_tiny_droplets(tiny_droplets);
                }
            }

            last_event_time = Some(e.time);

            let kind = match e.kind {
                SliderEventKind::Tick => {
                    count.record_droplet();

                    NestedJuiceKind::Droplet
                }
                SliderEventKind::Head | SliderEventKind::Repeat | SliderEventKind::Tail => {
                    count.record_fruit();

                    NestedJuiceKind::Fruit
                }
                SliderEventKind::LegacyLastTick => continue,
            };

            let offset = curve.position_at(e.path_progress).x - pos.x;

            nested_objects.push(NestedJuiceObject {
                x: (head_x + offset).clamp(0.0, PLAYFIELD_WIDTH),
                start_time: e.time,
                kind,
            });
        }

        Self {
            path_end_x: curve_points.last().map_or(pos.x, |p| p.x),
            nested_objects,
        }
    }
}

fn slider_events(
    start_time: f64,
    span_duration: f64,
    velocity: f64,
    tick_dist: f64,
    total_dist: f64,
    span_count: usize,
) -> Vec<SliderEvent> {
    let len = total_dist.min(MAX_LEN);
    let tick_dist = tick_dist.clamp(0.0, len);
    let min_dist_from_end = velocity * 10.0;

    let mut events = vec![SliderEvent {
        kind: SliderEventKind::Head,
        time: start_time,
        path_progress: 0.0,
    }];

    if tick_dist > 0.0 {
        for span in 0..span_count {
            let span_start_time = start_time + span as f64 * span_duration;
            let reversed = span % 2 == 1;
            let ticks_start = events.len();
            let mut d = tick_dist;

            while d <= len && d < len - min_dist_from_end {
                let path_progress = d / len;

                let time_progress = if reversed {
                    1.0 - path_progress
                } else {
                    path_progress
                };

                events.push(SliderEvent {
                    kind: SliderEventKind::Tick,
                    time: span_start_time + time_progress * span_duration,
                    path_progress,
                });

                d += tick_dist;
            }

            if reversed {
                events[ticks_start..].reverse();
            }

            if span < span_count - 1 {
                events.push(SliderEvent {
                    kind: SliderEventKind::Repeat,
                    time: span_start_time + span_duration,
                    path_progress: ((span + 1) % 2) as f64,
                });
            }
        }
    }

    let total_duration = span_count as f64 * span_duration;

    let final_span_idx = span_count - 1;
    let final_span_start_time = start_time + final_span_idx as f64 * span_duration;
    let final_span_end_time = (start_time + total_duration / 2.0)
        .max(final_span_start_time + span_duration - LEGACY_LAST_TICK_OFFSET);

    let mut final_progress = (final_span_end_time - final_span_start_time) / span_duration;

    if span_count % 2 == 0 {
        final_progress = 1.0 - final_progress;
    }

    events.push(SliderEvent {
        kind: SliderEventKind::LegacyLastTick,
        time: final_span_end_time,
        path_progress: final_progress,
    });

    events.push(SliderEvent {
        kind: SliderEventKind::Tail,
        time: start_time + total_duration,
        path_progress: (span_count % 2) as f64,
    });

    events
}
