use super::{DueLoansQuery, ILoanRepo};
use crate::repos::shared::mongo_repo::{self, MongoDocument};
use chrono::NaiveDate;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, Document},
    Collection, Database,
};
use reeni_domain::{LoanCategory, LoanItem, ReminderState, ID};
use serde::{Deserialize, Serialize};

pub struct MongoLoanRepo {
    collection: Collection<Document>,
}

impl MongoLoanRepo {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("loans"),
        }
    }
}

#[async_trait::async_trait]
impl ILoanRepo for MongoLoanRepo {
    async fn insert(&self, loan: &LoanItem) -> anyhow::Result<()> {
        mongo_repo::insert::<_, LoanMongo>(&self.collection, loan).await
    }

    async fn save(&self, loan: &LoanItem) -> anyhow::Result<()> {
        mongo_repo::save::<_, LoanMongo>(&self.collection, loan).await
    }

    async fn find(&self, loan_id: &ID) -> Option<LoanItem> {
        mongo_repo::find::<_, LoanMongo>(&self.collection, loan_id.inner_ref()).await
    }

    async fn find_all(&self) -> anyhow::Result<Vec<LoanItem>> {
        mongo_repo::find_many_by::<_, LoanMongo>(&self.collection, doc! {}).await
    }

    async fn find_due(&self, query: &DueLoansQuery) -> anyhow::Result<Vec<LoanItem>> {
        // Due dates are stored as zero-padded ISO strings, so `$lte`
        // compares them in calendar order.
        let filter = doc! {
            "returned": false,
            "email": { "$type": "string", "$ne": "" },
            "due_date": { "$lte": query.due_on.to_string() },
            "$or": [
                { "reminder": Bson::Null },
                { "reminder.last_sent_at": { "$lt": query.reminded_before } },
            ],
        };
        mongo_repo::find_many_by::<_, LoanMongo>(&self.collection, filter).await
    }

    async fn mark_reminded(&self, loan_id: &ID, sent_at: i64) -> anyhow::Result<()> {
        let update = doc! {
            "$set": { "reminder.last_sent_at": sent_at },
            "$inc": { "reminder.count": 1 },
        };
        self.collection
            .update_one(doc! { "_id": *loan_id.inner_ref() }, update, None)
            .await?;
        Ok(())
    }

    async fn delete(&self, loan_id: &ID) -> Option<LoanItem> {
        mongo_repo::delete::<_, LoanMongo>(&self.collection, loan_id.inner_ref()).await
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct LoanMongo {
    pub _id: ObjectId,
    pub person: String,
    pub amount: f64,
    pub category: LoanCategory,
    pub due_date: NaiveDate,
    pub email: Option<String>,
    pub returned: bool,
    pub reminder: Option<ReminderMongo>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ReminderMongo {
    pub last_sent_at: i64,
    pub count: u32,
}

impl MongoDocument<LoanItem> for LoanMongo {
    fn into_domain(self) -> LoanItem {
        LoanItem {
            id: ID::from(self._id),
            person: self.person,
            amount: self.amount,
            category: self.category,
            due_date: self.due_date,
            email: self.email,
            returned: self.returned,
            reminder: self.reminder.map(|r| ReminderState {
                last_sent_at: r.last_sent_at,
                count: r.count,
            }),
        }
    }

    fn from_domain(loan: &LoanItem) -> Self {
        Self {
            _id: *loan.id.inner_ref(),
            person: loan.person.clone(),
            amount: loan.amount,
            category: loan.category,
            due_date: loan.due_date,
            email: loan.email.clone(),
            returned: loan.returned,
            reminder: loan.reminder.as_ref().map(|r| ReminderMongo {
                last_sent_at: r.last_sent_at,
                count: r.count,
            }),
        }
    }

    fn get_id_filter(&self) -> Document {
        doc! {
            "_id": self._id
        }
    }
}
