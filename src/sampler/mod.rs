// Copyright @yucwang 2026

pub mod alias_table;
pub mod distribution_1d;
pub mod distribution_2d;
pub mod static_cdf;

pub use alias_table::AliasTable;
pub use distribution_1d::{
    cdf_continuous_pdf, cdf_discrete_pdf, cdf_eval_continuous, cdf_eval_discrete,
    cdf_sample_continuous, cdf_sample_discrete, CdfTable, Distribution1D,
};
pub use distribution_2d::Distribution2D;
pub use static_cdf::StaticCdf;
