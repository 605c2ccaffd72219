use crate::error::ReeniError;
use crate::shared::usecase::{execute, UseCase};
use actix_web::{web, HttpResponse};
use reeni_api_structs::get_loan::*;
use reeni_domain::{LoanItem, ID};
use reeni_infra::ReeniContext;

pub async fn get_loan_controller(
    path: web::Path<PathParams>,
    ctx: web::Data<ReeniContext>,
) -> Result<HttpResponse, ReeniError> {
    let usecase = GetLoanUseCase {
        loan_id: path.loan_id.clone(),
    };

    execute(usecase, &ctx)
        .await
        .map(|loan| HttpResponse::Ok().json(APIResponse::new(loan)))
        .map_err(ReeniError::from)
}

#[derive(Debug)]
pub struct GetLoanUseCase {
    pub loan_id: ID,
}

#[derive(Debug, PartialEq)]
pub enum UseCaseErrors {
    NotFound(ID),
}

impl From<UseCaseErrors> for ReeniError {
    fn from(e: UseCaseErrors) -> Self {
        match e {
            UseCaseErrors::NotFound(loan_id) => {
                Self::NotFound(format!("The loan with id: {}, was not found.", loan_id))
            }
        }
    }
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetLoanUseCase {
    type Response = LoanItem;

    type Errors = UseCaseErrors;

    const NAME: &'static str = "GetLoan";

    async fn execute(&mut self, ctx: &ReeniContext) -> Result<Self::Response, Self::Errors> {
        match ctx.repos.loans.find(&self.loan_id).await {
            Some(loan) => Ok(loan),
            None => Err(UseCaseErrors::NotFound(self.loan_id.clone())),
        }
    }
}
