use crate::dtos::LoanDTO;
use chrono::NaiveDate;
use reeni_domain::{LoanCategory, LoanItem, ID};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanResponse {
    pub loan: LoanDTO,
}

impl LoanResponse {
    pub fn new(loan: LoanItem) -> Self {
        Self {
            loan: LoanDTO::new(loan),
        }
    }
}

pub mod create_loan {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub person: String,
        pub amount: f64,
        pub category: LoanCategory,
        pub due_date: NaiveDate,
        pub email: Option<String>,
    }

    pub type APIResponse = LoanResponse;
}

pub mod get_loans {
    use super::*;

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct APIResponse {
        pub loans: Vec<LoanDTO>,
    }

    impl APIResponse {
        pub fn new(loans: Vec<LoanItem>) -> Self {
            Self {
                loans: loans.into_iter().map(LoanDTO::new).collect(),
            }
        }
    }
}

pub mod get_loan {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub loan_id: ID,
    }

    pub type APIResponse = LoanResponse;
}

pub mod update_loan {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub loan_id: ID,
    }

    #[derive(Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct RequestBody {
        pub person: Option<String>,
        pub amount: Option<f64>,
        pub category: Option<LoanCategory>,
        pub due_date: Option<NaiveDate>,
        pub email: Option<String>,
        pub returned: Option<bool>,
    }

    pub type APIResponse = LoanResponse;
}

pub mod delete_loan {
    use super::*;

    #[derive(Deserialize)]
    pub struct PathParams {
        pub loan_id: ID,
    }

    pub type APIResponse = LoanResponse;
}
