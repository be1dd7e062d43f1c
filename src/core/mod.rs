pub mod average;
pub mod interpolation;
pub mod layout;
pub mod line_path;
pub mod primitives;
pub mod projection;
pub mod scaling;
pub mod series;
pub mod types;
pub mod windowing;
pub mod zoom;

pub use average::{
    AverageCache, AverageCacheKey, AverageCacheStats, AverageLineId, global_average,
    rolling_average,
};
pub use interpolation::{
    Extrapolation, GAP_SPACING_MULTIPLIER, SegmentKind, average_sample_spacing, classify_segments,
    close_samples, known_indices, resample, resample_many,
};
pub use layout::{ChartPadding, PanelRegion, layout_panels, plot_area};
pub use line_path::{
    PathCommand, PathVertex, StyledRun, build_line_runs, catmull_rom_commands, polyline_commands,
    segment_commands,
};
pub use primitives::{MILLIS_PER_DAY, epoch_millis_to_datetime, next_day_boundary};
pub use projection::{
    PanelProjection, VALUE_MARGIN_FRACTION, inverse_project_x, inverse_project_y, project_x,
    project_y,
};
pub use scaling::{PanelScaling, ScaleInput};
pub use series::{LineStyle, OhlcValues, SmoothSource, StepMode, TimeSeriesPoint, validate_points};
pub use types::{PlotRect, TimeWindow, ValueRange, Viewport};
pub use windowing::{master_timeline, points_in_time_window, time_extent, widened_points};
pub use zoom::ZoomWindow;
