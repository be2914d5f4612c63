mod adjust;
mod get;
mod reset;
mod upsert;

use diesel::prelude::*;
use warp::Filter;
use crate::helper_model::RentalError;
use crate::model;

pub fn api_v1_admin_pricing() -> impl Filter<Extract = (impl warp::Reply,), Error = warp::Rejection> + Clone
{
    warp::path("pricing")
        .and(
            get::main()
                .or(upsert::main())
                .or(adjust::main())
                .or(reset::main())
        )
        .and(warp::path::end())
}

/// Loads the season a pricing request targets.
fn find_season(conn: &mut PgConnection, season_id: i32) -> Result<model::Season, RentalError> {
    use crate::schema::seasons::dsl as season_q;
    let season = season_q::seasons.find(season_id).get_result::<model::Season>(conn)?;
    Ok(season)
}
