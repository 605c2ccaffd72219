use crate::error::ReeniError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use chrono::NaiveDate;
use reeni_api_structs::update_loan::*;
use reeni_domain::{LoanCategory, LoanItem, ID};
use reeni_infra::ReeniContext;

pub async fn update_loan_controller(
    path: web::Path<PathParams>,
    body: web::Json<RequestBody>,
    ctx: web::Data<ReeniContext>,
) -> Result<HttpResponse, ReeniError> {
    let body = body.0;
    let usecase = UpdateLoanUseCase {
        loan_id: path.loan_id.clone(),
        person: body.person,
        amount: body.amount,
        category: body.category,
        due_date: body.due_date,
        email: body.email,
        returned: body.returned,
    };

    execute(usecase, &ctx)
        .await
        .map(|loan| HttpResponse::Ok().json(APIResponse::new(loan)))
        .map_err(ReeniError::from)
}

#[derive(Debug)]
pub struct UpdateLoanUseCase {
    pub loan_id: ID,
    pub person: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<LoanCategory>,
    pub due_date: Option<NaiveDate>,
    pub email: Option<String>,
    pub returned: Option<bool>,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseErrors {
    NotFound(ID),
    EmptyPerson,
    InvalidAmount(f64),
    StorageError,
}

impl From<UseCaseErrors> for ReeniError {
    fn from(e: UseCaseErrors) -> Self {
        match e {
            UseCaseErrors::NotFound(loan_id) => {
                Self::NotFound(format!("The loan with id: {}, was not found.", loan_id))
            }
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
impl UseCase for UpdateLoanUseCase {
    type Response = LoanItem;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "UpdateLoan";

    async fn execute(&mut self, ctx: &ReeniContext) -> Result<Self::Response, Self::Errors> {
        let mut loan = match ctx.repos.loans.find(&self.loan_id).await {
            Some(loan) => loan,
            None => return Err(UseCaseErrors::NotFound(self.loan_id.clone())),
        };

        if let Some(person) = &self.person {
            if person.trim().is_empty() {
                return Err(UseCaseErrors::EmptyPerson);
            }
            loan.person = person.clone();
        }
        if let Some(amount) = self.amount {
            if amount <= 0.0 {
                return Err(UseCaseErrors::InvalidAmount(amount));
            }
            loan.amount = amount;
        }
        if let Some(category) = self.category {
            loan.category = category;
        }
        if let Some(due_date) = self.due_date {
            loan.due_date = due_date;
        }
        if let Some(email) = &self.email {
            loan.email = Some(email.clone());
        }
        if let Some(returned) = self.returned {
            loan.returned = returned;
        }

        // The reminder marker is owned by the scheduler and round-trips
        // through the save untouched.
        ctx.repos
            .loans
            .save(&loan)
            .await
            .map_err(|_| UseCaseErrors::StorageError)?;

        Ok(loan)
    }
}
