mod create_loan;
mod delete_loan;
mod get_loan;
mod get_loans;
mod update_loan;

use actix_web::web;
use create_loan::create_loan_controller;
use delete_loan::delete_loan_controller;
use get_loan::get_loan_controller;
use get_loans::get_loans_controller;
use update_loan::update_loan_controller;

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/loans", web::post().to(create_loan_controller));
    cfg.route("/loans", web::get().to(get_loans_controller));
    cfg.route("/loans/{loan_id}", web::get().to(get_loan_controller));
    cfg.route("/loans/{loan_id}", web::put().to(update_loan_controller));
    cfg.route("/loans/{loan_id}", web::delete().to(delete_loan_controller));
}
