pub mod loaders;
pub mod params;
pub mod suggestion;

pub use loaders::{csv_excerpt, load_params_csv, parse_params_csv, CsvLoad, LoadedRow};
pub use params::{DayOfWeek, RecommendationParams, Season, TimeOfDay};
pub use suggestion::{Friend, Group, Suggestion, SuggestionIcon, SuggestionItem, MAX_ITEMS, MIN_ITEMS};
