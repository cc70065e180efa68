pub mod contour;
pub mod field;
pub mod isochrone;
pub mod reach;
pub mod schedule;
pub mod shared;

pub mod prelude {
    pub use crate::contour::{Contour, ContourParams, ExtractionMethod};
    pub use crate::field::{RadialParams, SampleSet, TravelTimeSample};
    pub use crate::isochrone::{
        IsochroneConfig, IsochroneRegion, IsochroneRequest, IsochroneSet, ModeFilter,
    };
    pub use crate::reach::ConnectivityResult;
    pub use crate::schedule::{ScheduleData, ScheduleIndex};
    pub use crate::shared::{ClockTime, Coordinate, Distance, Duration};
}
