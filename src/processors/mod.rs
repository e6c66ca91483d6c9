pub mod column_validator;
pub mod height_extrapolator;
pub mod pipeline;
pub mod row_validator;
pub mod schema_normalizer;
pub mod shear_estimator;
pub mod unit_converter;

pub use column_validator::ColumnValidator;
pub use height_extrapolator::HeightExtrapolator;
pub use pipeline::{Pipeline, PipelineOutput};
pub use row_validator::RowValidator;
pub use schema_normalizer::SchemaNormalizer;
pub use shear_estimator::{shear_exponent, ShearEstimator};
pub use unit_converter::{PressureUnit, UnitConverter};
