//! Return Requests Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};
use stockroom::returns::{
    BankInfo, ExchangeTarget, RefundDetails, ReturnKind, ReturnStatus, ReturnType,
};

use crate::{
    database::{decode_str, decode_u64, encode_u64},
    domain::{
        orders::records::{OrderItemRecord, OrderItemUuid, OrderUuid},
        returns::{
            data::{NewReturnRequest, StatusChange},
            records::{ReturnRequestRecord, ReturnRequestUuid},
        },
    },
};

const CREATE_RETURN_REQUEST_SQL: &str = include_str!("sql/create_return_request.sql");
const GET_RETURN_REQUEST_SQL: &str = include_str!("sql/get_return_request.sql");
const LIST_RETURN_REQUESTS_SQL: &str = include_str!("sql/list_return_requests.sql");
const UPDATE_STATUS_SQL: &str = include_str!("sql/update_status.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgReturnRequestsRepository;

impl PgReturnRequestsRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn create_return_request(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: ReturnRequestUuid,
        request_code: &str,
        item: &OrderItemRecord,
        request: &NewReturnRequest,
    ) -> Result<ReturnRequestRecord, sqlx::Error> {
        let (refund_amount, bank, exchange) = match &request.kind {
            ReturnKind::Refund(refund) => (
                Some(encode_u64("refund_amount", refund.amount)?),
                Some(&refund.bank),
                None,
            ),
            ReturnKind::Exchange(target) => (None, None, Some(target)),
        };

        query_as::<Postgres, ReturnRequestRecord>(CREATE_RETURN_REQUEST_SQL)
            .bind(uuid.into_uuid())
            .bind(request_code)
            .bind(item.order_uuid.into_uuid())
            .bind(item.uuid.into_uuid())
            .bind(request.kind.return_type().as_str())
            .bind(request.reason.trim())
            .bind(&request.evidence_images)
            .bind(refund_amount)
            .bind(bank.map(|bank| bank.bank_name.trim()))
            .bind(bank.map(|bank| bank.account_number.trim()))
            .bind(bank.map(|bank| bank.account_holder.trim()))
            .bind(exchange.map(|target| target.size.trim()))
            .bind(exchange.map(|target| target.color.trim()))
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn get_return_request(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: ReturnRequestUuid,
    ) -> Result<ReturnRequestRecord, sqlx::Error> {
        query_as::<Postgres, ReturnRequestRecord>(GET_RETURN_REQUEST_SQL)
            .bind(uuid.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Requests newest first, optionally only those in `status`.
    pub(crate) async fn list_return_requests(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        status: Option<ReturnStatus>,
    ) -> Result<Vec<ReturnRequestRecord>, sqlx::Error> {
        query_as::<Postgres, ReturnRequestRecord>(LIST_RETURN_REQUESTS_SQL)
            .bind(status.map(ReturnStatus::as_str))
            .fetch_all(&mut **tx)
            .await
    }

    /// Compare-and-swap the status. Returns `None` when the request is no longer
    /// in `expected`, i.e. a concurrent transition won.
    pub(crate) async fn update_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        uuid: ReturnRequestUuid,
        expected: ReturnStatus,
        change: &StatusChange<'_>,
    ) -> Result<Option<ReturnRequestRecord>, sqlx::Error> {
        query_as::<Postgres, ReturnRequestRecord>(UPDATE_STATUS_SQL)
            .bind(uuid.into_uuid())
            .bind(expected.as_str())
            .bind(change.to.as_str())
            .bind(change.actor)
            .bind(change.notes)
            .bind(change.rejection_reason)
            .bind(change.settlement.map(|settlement| settlement.as_str()))
            .fetch_optional(&mut **tx)
            .await
    }
}

impl<'r> FromRow<'r, PgRow> for ReturnRequestRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let return_type: String = row.try_get("return_type")?;
        let status: String = row.try_get("status")?;
        let settlement: Option<String> = row.try_get("settlement")?;

        let kind = match decode_str::<ReturnType>("return_type", &return_type)? {
            ReturnType::Exchange => ReturnKind::Exchange(ExchangeTarget {
                size: row.try_get("exchange_to_size")?,
                color: row.try_get("exchange_to_color")?,
            }),
            ReturnType::Refund => ReturnKind::Refund(RefundDetails {
                amount: decode_u64("refund_amount", row.try_get("refund_amount")?)?,
                bank: BankInfo {
                    bank_name: row.try_get("bank_name")?,
                    account_number: row.try_get("account_number")?,
                    account_holder: row.try_get("account_holder")?,
                },
            }),
        };

        Ok(Self {
            uuid: ReturnRequestUuid::from_uuid(row.try_get("uuid")?),
            request_code: row.try_get("request_code")?,
            order_uuid: OrderUuid::from_uuid(row.try_get("order_uuid")?),
            order_item_uuid: OrderItemUuid::from_uuid(row.try_get("order_item_uuid")?),
            kind,
            status: decode_str("status", &status)?,
            reason: row.try_get("reason")?,
            evidence_images: row.try_get("evidence_images")?,
            admin_notes: row.try_get("admin_notes")?,
            rejection_reason: row.try_get("rejection_reason")?,
            settlement: settlement
                .map(|settlement| decode_str("settlement", &settlement))
                .transpose()?,
            processed_by: row.try_get("processed_by")?,
            processed_at: row
                .try_get::<Option<SqlxTimestamp>, _>("processed_at")?
                .map(SqlxTimestamp::to_jiff),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
