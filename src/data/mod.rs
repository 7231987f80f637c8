//! Data module - CSV loading and feature engineering

pub mod features;
pub mod loader;

pub use features::{derive_features, FeatureError, IncomeBrackets};
pub use loader::LoaderError;

/// Column names of the application table, upstream and derived.
pub mod columns {
    pub const ID: &str = "SK_ID_CURR";
    pub const TARGET: &str = "TARGET";
    pub const GENDER: &str = "CODE_GENDER";
    pub const EDUCATION: &str = "NAME_EDUCATION_TYPE";
    pub const FAMILY_STATUS: &str = "NAME_FAMILY_STATUS";
    pub const HOUSING_TYPE: &str = "NAME_HOUSING_TYPE";
    pub const CONTRACT_TYPE: &str = "NAME_CONTRACT_TYPE";
    pub const CHILDREN: &str = "CNT_CHILDREN";
    pub const FAMILY_MEMBERS: &str = "CNT_FAM_MEMBERS";
    pub const DAYS_BIRTH: &str = "DAYS_BIRTH";
    pub const DAYS_EMPLOYED: &str = "DAYS_EMPLOYED";
    pub const INCOME: &str = "AMT_INCOME_TOTAL";
    pub const CREDIT: &str = "AMT_CREDIT";
    pub const ANNUITY: &str = "AMT_ANNUITY";
    pub const GOODS_PRICE: &str = "AMT_GOODS_PRICE";

    // Derived columns
    pub const AGE_YEARS: &str = "AGE_YEARS";
    pub const EMPLOYMENT_YEARS: &str = "EMPLOYMENT_YEARS";
    pub const DTI: &str = "DTI";
    pub const LTI: &str = "LTI";
    pub const INCOME_BRACKET: &str = "INCOME_BRACKET";
}
