use anyhow::Result;
use futures::stream::StreamExt;
use mongodb::{
    bson::{self, doc, oid::ObjectId, Document},
    Collection, Cursor,
};
use serde::{de::DeserializeOwned, Serialize};
use tracing::error;

pub trait MongoDocument<E>: Serialize + DeserializeOwned {
    fn into_domain(self) -> E;
    fn from_domain(entity: &E) -> Self;
    fn get_id_filter(&self) -> Document;
}

fn get_id_filter(oid: &ObjectId) -> Document {
    doc! {
        "_id": *oid
    }
}

fn entity_to_persistence<E, D: MongoDocument<E>>(entity: &E) -> Document {
    let raw = D::from_domain(entity);
    doc_to_persistence(&raw)
}

fn persistence_to_entity<E, D: MongoDocument<E>>(doc: Document) -> E {
    let raw: D = bson::from_document(doc).unwrap();
    raw.into_domain()
}

fn doc_to_persistence<E, D: MongoDocument<E>>(raw: &D) -> Document {
    bson::to_document(raw).unwrap()
}

pub async fn insert<E, D: MongoDocument<E>>(
    collection: &Collection<Document>,
    entity: &E,
) -> Result<()> {
    let doc = entity_to_persistence::<E, D>(entity);
    collection.insert_one(doc, None).await?;
    Ok(())
}

pub async fn save<E, D: MongoDocument<E>>(
    collection: &Collection<Document>,
    entity: &E,
) -> Result<()> {
    let raw = D::from_domain(entity);
    let filter = raw.get_id_filter();
    let doc = doc_to_persistence(&raw);
    collection.replace_one(filter, doc, None).await?;
    Ok(())
}

pub async fn find<E, D: MongoDocument<E>>(
    collection: &Collection<Document>,
    oid: &ObjectId,
) -> Option<E> {
    let filter = get_id_filter(oid);
    match collection.find_one(filter, None).await {
        Ok(Some(doc)) => Some(persistence_to_entity::<E, D>(doc)),
        _ => None,
    }
}

pub async fn find_many_by<E, D: MongoDocument<E>>(
    collection: &Collection<Document>,
    filter: Document,
) -> Result<Vec<E>> {
    let cursor = collection.find(filter, None).await?;
    Ok(consume_cursor::<E, D>(cursor).await)
}

pub async fn delete<E, D: MongoDocument<E>>(
    collection: &Collection<Document>,
    oid: &ObjectId,
) -> Option<E> {
    let filter = get_id_filter(oid);
    match collection.find_one_and_delete(filter, None).await {
        Ok(Some(doc)) => Some(persistence_to_entity::<E, D>(doc)),
        _ => None,
    }
}

async fn consume_cursor<E, D: MongoDocument<E>>(mut cursor: Cursor<Document>) -> Vec<E> {
    let mut documents = vec![];
    while let Some(result) = cursor.next().await {
        match result {
            Ok(document) => {
                documents.push(persistence_to_entity::<E, D>(document));
            }
            Err(e) => {
                error!("Error getting cursor for loan repo: {:?}", e);
            }
        }
    }

    documents
}
