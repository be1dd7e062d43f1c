use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{LineStyle, SegmentKind, StepMode};

/// One path command in pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PathCommand {
    MoveTo { x: f64, y: f64 },
    LineTo { x: f64, y: f64 },
    CubicTo {
        c1x: f64,
        c1y: f64,
        c2x: f64,
        c2y: f64,
        x: f64,
        y: f64,
    },
    Close,
}

impl PathCommand {
    /// End point of the command, `None` for `Close`.
    #[must_use]
    pub fn end_point(self) -> Option<(f64, f64)> {
        match self {
            Self::MoveTo { x, y } | Self::LineTo { x, y } | Self::CubicTo { x, y, .. } => {
                Some((x, y))
            }
            Self::Close => None,
        }
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        match self {
            Self::MoveTo { x, y } | Self::LineTo { x, y } => x.is_finite() && y.is_finite(),
            Self::CubicTo {
                c1x,
                c1y,
                c2x,
                c2y,
                x,
                y,
            } => [c1x, c1y, c2x, c2y, x, y].iter().all(|v| v.is_finite()),
            Self::Close => true,
        }
    }
}

/// Projected sample feeding the path builder.
///
/// `control_y` is the projected value of the smoothing source (open, high,
/// low or mid); it equals `y` for close-driven smoothing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PathVertex {
    pub x: f64,
    pub y: f64,
    pub control_y: f64,
}

impl PathVertex {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y, control_y: y }
    }

    #[must_use]
    pub fn with_control_y(mut self, control_y: f64) -> Self {
        self.control_y = control_y;
        self
    }
}

/// Consecutive commands sharing one stroke style.
///
/// Each run opens with a `MoveTo` on the last point of the previous run, so
/// switching between solid and dashed never leaves a visual hole.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledRun {
    pub dashed: bool,
    pub commands: Vec<PathCommand>,
}

/// Commands drawing one segment, excluding its starting point.
#[must_use]
pub fn segment_commands(from: PathVertex, to: PathVertex, style: LineStyle) -> SmallVec<[PathCommand; 3]> {
    let mut commands = SmallVec::new();
    match style {
        LineStyle::Linear => commands.push(PathCommand::LineTo { x: to.x, y: to.y }),
        LineStyle::Smooth(_) => {
            let third = (to.x - from.x) / 3.0;
            commands.push(PathCommand::CubicTo {
                c1x: from.x + third,
                c1y: from.y,
                c2x: to.x - third,
                c2y: to.control_y,
                x: to.x,
                y: to.y,
            });
        }
        LineStyle::Step(StepMode::To) => {
            commands.push(PathCommand::LineTo { x: from.x, y: to.y });
            commands.push(PathCommand::LineTo { x: to.x, y: to.y });
        }
        LineStyle::Step(StepMode::From) => {
            commands.push(PathCommand::LineTo { x: to.x, y: from.y });
            commands.push(PathCommand::LineTo { x: to.x, y: to.y });
        }
        LineStyle::Step(StepMode::Center) => {
            let mid = (from.x + to.x) * 0.5;
            commands.push(PathCommand::LineTo { x: mid, y: from.y });
            commands.push(PathCommand::LineTo { x: mid, y: to.y });
            commands.push(PathCommand::LineTo { x: to.x, y: to.y });
        }
    }
    commands
}

/// Builds styled runs for a series of vertices.
///
/// `segments[i]` classifies the segment between `vertices[i]` and
/// `vertices[i + 1]`. Gap segments are dashed unless `fill_gaps` is set.
#[must_use]
pub fn build_line_runs(
    vertices: &[PathVertex],
    segments: &[SegmentKind],
    style: LineStyle,
    fill_gaps: bool,
) -> Vec<StyledRun> {
    let mut runs: Vec<StyledRun> = Vec::new();
    for (index, pair) in vertices.windows(2).enumerate() {
        let dashed = !fill_gaps && segments.get(index) == Some(&SegmentKind::Gap);
        let needs_new_run = runs.last().is_none_or(|run| run.dashed != dashed);
        if needs_new_run {
            runs.push(StyledRun {
                dashed,
                commands: vec![PathCommand::MoveTo {
                    x: pair[0].x,
                    y: pair[0].y,
                }],
            });
        }
        if let Some(run) = runs.last_mut() {
            run.commands.extend(segment_commands(pair[0], pair[1], style));
        }
    }
    runs
}

/// Catmull-Rom spline through `points`, converted to cubic Bezier commands.
#[must_use]
pub fn catmull_rom_commands(points: &[(f64, f64)], closed: bool) -> Vec<PathCommand> {
    let Some(&(x0, y0)) = points.first() else {
        return Vec::new();
    };
    let mut commands = vec![PathCommand::MoveTo { x: x0, y: y0 }];
    let n = points.len();
    if n < 2 {
        return commands;
    }

    let at = |index: isize| -> (f64, f64) {
        if closed {
            points[index.rem_euclid(n as isize) as usize]
        } else {
            points[index.clamp(0, n as isize - 1) as usize]
        }
    };
    let segment_count = if closed { n } else { n - 1 };
    for i in 0..segment_count as isize {
        let p0 = at(i - 1);
        let p1 = at(i);
        let p2 = at(i + 1);
        let p3 = at(i + 2);
        commands.push(PathCommand::CubicTo {
            c1x: p1.0 + (p2.0 - p0.0) / 6.0,
            c1y: p1.1 + (p2.1 - p0.1) / 6.0,
            c2x: p2.0 - (p3.0 - p1.0) / 6.0,
            c2y: p2.1 - (p3.1 - p1.1) / 6.0,
            x: p2.0,
            y: p2.1,
        });
    }
    if closed {
        commands.push(PathCommand::Close);
    }
    commands
}

/// Straight polyline through `points`.
#[must_use]
pub fn polyline_commands(points: &[(f64, f64)], closed: bool) -> Vec<PathCommand> {
    let mut commands: Vec<PathCommand> = points
        .iter()
        .enumerate()
        .map(|(index, &(x, y))| {
            if index == 0 {
                PathCommand::MoveTo { x, y }
            } else {
                PathCommand::LineTo { x, y }
            }
        })
        .collect();
    if closed && !commands.is_empty() {
        commands.push(PathCommand::Close);
    }
    commands
}
