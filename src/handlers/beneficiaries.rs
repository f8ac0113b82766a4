use std::sync::Arc;

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::{Beneficiary, Notice};
use crate::services::beneficiaries::{self, AddOutcome, NewBeneficiary};
use crate::services::session::Session;
use crate::state::AppState;

#[derive(Serialize)]
pub struct BeneficiariesResponse {
    beneficiaries: Vec<Beneficiary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notice: Option<Notice>,
}

// GET /api/beneficiaries
pub async fn list(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<BeneficiariesResponse>, AppError> {
    let beneficiaries = match session.uid() {
        Some(uid) => {
            let db = state.conn()?;
            beneficiaries::list(&db, uid)
        }
        None => Vec::new(),
    };

    Ok(Json(BeneficiariesResponse {
        beneficiaries,
        notice: None,
    }))
}

// POST /api/beneficiaries
#[derive(Deserialize)]
pub struct AddRequest {
    pub name: String,
    pub upi: String,
    #[serde(default)]
    pub bank: String,
    #[serde(default)]
    pub phone: String,
}

pub async fn add(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(body): Json<AddRequest>,
) -> Result<Json<BeneficiariesResponse>, AppError> {
    let identity = session.require("save beneficiaries")?;

    let outcome = {
        let db = state.conn()?;
        beneficiaries::add(
            &db,
            &identity.uid,
            NewBeneficiary {
                name: body.name,
                upi: body.upi,
                bank: body.bank,
                phone: body.phone,
            },
        )?
    };

    let response = match outcome {
        AddOutcome::Added(list) => BeneficiariesResponse {
            beneficiaries: list,
            notice: Some(Notice::success("Beneficiary added.")),
        },
        AddOutcome::Duplicate(list) => BeneficiariesResponse {
            beneficiaries: list,
            notice: Some(Notice::warning("A beneficiary with this UPI ID already exists.")),
        },
    };
    Ok(Json(response))
}

// DELETE /api/beneficiaries/:upi
pub async fn remove(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(upi): Path<String>,
) -> Result<Json<BeneficiariesResponse>, AppError> {
    let identity = session.require("remove beneficiaries")?;

    let remaining = {
        let db = state.conn()?;
        beneficiaries::remove(&db, &identity.uid, &upi)?
    };

    Ok(Json(BeneficiariesResponse {
        beneficiaries: remaining,
        notice: Some(Notice::success("Beneficiary removed.")),
    }))
}
