use crate::error::ReeniError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use reeni_api_structs::create_loan::*;
use reeni_domain::{LoanCategory, LoanItem};
use reeni_infra::ReeniContext;

pub async fn create_loan_controller(
    body: web::Json<RequestBody>,
    ctx: web::Data<ReeniContext>,
) -> Result<HttpResponse, ReeniError> {
    let body = body.0;
    let usecase = CreateLoanUseCase {
        person: body.person,
        amount: body.amount,
        category: body.category,
        due_date: body.due_date,
        email: body.email,
    };

    execute(usecase, &ctx)
        .await
        .map(|loan| HttpResponse::Created().json(APIResponse::new(loan)))
        .map_err(ReeniError::from)
}

#[derive(Debug)]
pub struct CreateLoanUseCase {
    pub person: String,
    pub amount: f64,
    pub category: LoanCategory,
    pub due_date: NaiveDate,
    pub email: Option<String>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseErrors {
    EmptyPerson,
    InvalidAmount(f64),
    StorageError,
}

impl From<UseCaseErrors> for ReeniError {
    fn from(e: UseCaseErrors) -> Self {
        match e {
            UseCaseErrors::EmptyPerson => {
                Self::BadClientData("The person name cannot be empty".into())
            }
            UseCaseErrors::InvalidAmount(amount) => Self::BadClientData(format!(
                "The amount: {} is not a valid loan amount, it must be positive.",
                amount
            )),
            UseCaseErrors::StorageError => Self::InternalError,
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for CreateLoanUseCase {
    type Response = LoanItem;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "CreateLoan";

    async fn execute(&mut self, ctx: &ReeniContext) -> Result<Self::Response, Self::Errors> {
        if self.person.trim().is_empty() {
            return Err(UseCaseErrors::EmptyPerson);
        }
        if self.amount <= 0.0 {
            return Err(UseCaseErrors::InvalidAmount(self.amount));
        }

        let loan = LoanItem {
            id: Default::default(),
            person: self.person.clone(),
            amount: self.amount,
            category: self.category,
            due_date: self.due_date,
            email: self.email.clone(),
            returned: false,
            reminder: None,
        };

        ctx.repos
            .loans
            .insert(&loan)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;

        Ok(loan)
    }
}
