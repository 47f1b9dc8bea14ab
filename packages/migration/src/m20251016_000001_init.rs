use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_query::{ColumnDef, ForeignKeyAction, Index, Table};

#[derive(DeriveMigrationName)]
pub struct Migration;

// ----- Iden enums for tables & columns -----
#[derive(Iden)]
enum Users {
    Table,
    Id,
    Sub,
    Email,
    PasswordHash,
    FullName,
    CompanyName,
    Role,
    IsActive,
    IsVerified,
    LoginCount,
    LastLoginAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Subscriptions {
    Table,
    Id,
    UserId,
    PlanType,
    Status,
    CurrentPeriodStart,
    CurrentPeriodEnd,
    CancelAtPeriodEnd,
    CancelledAt,
    ForecastsLimit,
    ForecastsUsed,
    CitiesLimit,
    ApiCallsLimit,
    ApiCallsUsed,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Products {
    Table,
    Id,
    UserId,
    Name,
    Description,
    Category,
    BasePrice,
    Currency,
    ProductionMethod,
    TargetMarket,
    QualityTier,
    Specifications,
    IsActive,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Cities {
    Table,
    Id,
    Name,
    Country,
    CountryCode,
    Region,
    Population,
    PopulationDensity,
    GdpPerCapita,
    PurchasingPowerIndex,
    EcommercePenetration,
    CompetitionDensity,
    InternetPenetration,
    LogisticsInfrastructureScore,
    AverageOrderValue,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Forecasts {
    Table,
    Id,
    UserId,
    ProductId,
    TargetCityId,
    Status,
    ErrorMessage,
    ProcessingStartedAt,
    ProcessingCompletedAt,
    ProcessingDurationSeconds,
    DemandScore,
    CompetitionIndex,
    ProfitabilityScore,
    MarketFitScore,
    RiskScore,
    OverallScore,
    ExpectedMonthlySalesVolume,
    ExpectedAnnualRevenue,
    ExpectedProfitMargin,
    RecommendedPrice,
    RecommendedPriceMin,
    RecommendedPriceMax,
    PriceElasticity,
    CityRankings,
    ProductAnalysisSummary,
    MarketAnalysisSummary,
    AdvertisingStrategySummary,
    SupplyChainSummary,
    SalesStrategySummary,
    ProductAnalysisData,
    MarketAnalysisData,
    AdvertisingStrategyData,
    SupplyChainData,
    SalesStrategyData,
    ModelVersion,
    TokensUsed,
    CostUsd,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum AgentLogs {
    Table,
    Id,
    ForecastId,
    AgentKind,
    AgentName,
    Status,
    IsSuccessful,
    ErrorMessage,
    StartedAt,
    CompletedAt,
    ExecutionTimeMs,
    InputData,
    OutputData,
    Summary,
    ModelName,
    TokensUsed,
    PromptTokens,
    CompletionTokens,
    CostUsd,
    ReasoningSteps,
    ConfidenceScore,
    RetryCount,
    CreatedAt,
}

#[derive(Iden)]
enum ApiKeys {
    Table,
    Id,
    UserId,
    KeyHash,
    Name,
    Prefix,
    IsActive,
    IsRevoked,
    LastUsedAt,
    UsageCount,
    RateLimitPerMinute,
    ExpiresAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum Payments {
    Table,
    Id,
    UserId,
    PaymentType,
    Status,
    Amount,
    Currency,
    AmountRefunded,
    Description,
    ItemName,
    CheckoutSessionId,
    PaidAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(Iden)]
enum DeepReports {
    Table,
    Id,
    UserId,
    ForecastId,
    PaymentId,
    ReportType,
    PricePaid,
    Currency,
    ReportData,
    ExecutiveSummary,
    DownloadCount,
    CreatedAt,
    UpdatedAt,
}

fn pk<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .big_integer()
        .not_null()
        .primary_key()
        .auto_increment()
        .to_owned()
}

fn ts<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col)
        .timestamp_with_time_zone()
        .not_null()
        .to_owned()
}

fn ts_null<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).timestamp_with_time_zone().null().to_owned()
}

fn score<T: IntoIden>(col: T) -> ColumnDef {
    ColumnDef::new(col).double().null().to_owned()
}

fn owner_fk(name: &str, from: impl IntoTableRef, col: impl IntoIden) -> ForeignKeyCreateStatement {
    ForeignKey::create()
        .name(name)
        .from(from, col)
        .to(Users::Table, Users::Id)
        .on_delete(ForeignKeyAction::Cascade)
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // users
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(pk(Users::Id))
                    .col(ColumnDef::new(Users::Sub).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::FullName).string().null())
                    .col(ColumnDef::new(Users::CompanyName).string().null())
                    .col(
                        ColumnDef::new(Users::Role)
                            .string_len(16)
                            .not_null()
                            .default("user"),
                    )
                    .col(
                        ColumnDef::new(Users::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(Users::IsVerified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Users::LoginCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ts_null(Users::LastLoginAt))
                    .col(ts(Users::CreatedAt))
                    .col(ts(Users::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        // subscriptions (one per user)
        manager
            .create_table(
                Table::create()
                    .table(Subscriptions::Table)
                    .if_not_exists()
                    .col(pk(Subscriptions::Id))
                    .col(
                        ColumnDef::new(Subscriptions::UserId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::PlanType)
                            .string_len(16)
                            .not_null()
                            .default("basic"),
                    )
                    .col(
                        ColumnDef::new(Subscriptions::Status)
                            .string_len(32)
                            .not_null()
                            .default("active"),
                    )
                    .col(ts(Subscriptions::CurrentPeriodStart))
                    .col(ts_null(Subscriptions::CurrentPeriodEnd))
                    .col(
                        ColumnDef::new(Subscriptions::CancelAtPeriodEnd)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ts_null(Subscriptions::CancelledAt))
                    .col(ColumnDef::new(Subscriptions::ForecastsLimit).integer().null())
                    .col(
                        ColumnDef::new(Subscriptions::ForecastsUsed)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Subscriptions::CitiesLimit).integer().not_null())
                    .col(ColumnDef::new(Subscriptions::ApiCallsLimit).integer().null())
                    .col(
                        ColumnDef::new(Subscriptions::ApiCallsUsed)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ts(Subscriptions::CreatedAt))
                    .col(ts(Subscriptions::UpdatedAt))
                    .foreign_key(&mut owner_fk(
                        "fk_subscriptions_user_id",
                        Subscriptions::Table,
                        Subscriptions::UserId,
                    ))
                    .to_owned(),
            )
            .await?;

        // products
        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(pk(Products::Id))
                    .col(ColumnDef::new(Products::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Products::Name).string_len(200).not_null())
                    .col(ColumnDef::new(Products::Description).text().null())
                    .col(ColumnDef::new(Products::Category).string_len(32).not_null())
                    .col(ColumnDef::new(Products::BasePrice).double().not_null())
                    .col(
                        ColumnDef::new(Products::Currency)
                            .string_len(3)
                            .not_null()
                            .default("USD"),
                    )
                    .col(ColumnDef::new(Products::ProductionMethod).string_len(16).null())
                    .col(ColumnDef::new(Products::TargetMarket).string().null())
                    .col(ColumnDef::new(Products::QualityTier).string_len(16).null())
                    .col(ColumnDef::new(Products::Specifications).json().null())
                    .col(
                        ColumnDef::new(Products::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ts(Products::CreatedAt))
                    .col(ts(Products::UpdatedAt))
                    .foreign_key(&mut owner_fk(
                        "fk_products_user_id",
                        Products::Table,
                        Products::UserId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_products_user_id")
                    .table(Products::Table)
                    .col(Products::UserId)
                    .to_owned(),
            )
            .await?;

        // cities
        manager
            .create_table(
                Table::create()
                    .table(Cities::Table)
                    .if_not_exists()
                    .col(pk(Cities::Id))
                    .col(ColumnDef::new(Cities::Name).string().not_null())
                    .col(ColumnDef::new(Cities::Country).string_len(100).not_null())
                    .col(ColumnDef::new(Cities::CountryCode).string_len(3).not_null())
                    .col(ColumnDef::new(Cities::Region).string().null())
                    .col(ColumnDef::new(Cities::Population).big_integer().not_null())
                    .col(score(Cities::PopulationDensity))
                    .col(score(Cities::GdpPerCapita))
                    .col(
                        ColumnDef::new(Cities::PurchasingPowerIndex)
                            .double()
                            .not_null()
                            .default(100.0),
                    )
                    .col(
                        ColumnDef::new(Cities::EcommercePenetration)
                            .double()
                            .not_null()
                            .default(50.0),
                    )
                    .col(
                        ColumnDef::new(Cities::CompetitionDensity)
                            .double()
                            .not_null()
                            .default(50.0),
                    )
                    .col(score(Cities::InternetPenetration))
                    .col(score(Cities::LogisticsInfrastructureScore))
                    .col(score(Cities::AverageOrderValue))
                    .col(ts(Cities::CreatedAt))
                    .col(ts(Cities::UpdatedAt))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_cities_population")
                    .table(Cities::Table)
                    .col(Cities::Population)
                    .to_owned(),
            )
            .await?;

        // forecasts
        manager
            .create_table(
                Table::create()
                    .table(Forecasts::Table)
                    .if_not_exists()
                    .col(pk(Forecasts::Id))
                    .col(ColumnDef::new(Forecasts::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Forecasts::ProductId).big_integer().not_null())
                    .col(ColumnDef::new(Forecasts::TargetCityId).big_integer().null())
                    .col(
                        ColumnDef::new(Forecasts::Status)
                            .string_len(16)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Forecasts::ErrorMessage).text().null())
                    .col(ts_null(Forecasts::ProcessingStartedAt))
                    .col(ts_null(Forecasts::ProcessingCompletedAt))
                    .col(score(Forecasts::ProcessingDurationSeconds))
                    .col(score(Forecasts::DemandScore))
                    .col(score(Forecasts::CompetitionIndex))
                    .col(score(Forecasts::ProfitabilityScore))
                    .col(score(Forecasts::MarketFitScore))
                    .col(score(Forecasts::RiskScore))
                    .col(score(Forecasts::OverallScore))
                    .col(
                        ColumnDef::new(Forecasts::ExpectedMonthlySalesVolume)
                            .big_integer()
                            .null(),
                    )
                    .col(score(Forecasts::ExpectedAnnualRevenue))
                    .col(score(Forecasts::ExpectedProfitMargin))
                    .col(score(Forecasts::RecommendedPrice))
                    .col(score(Forecasts::RecommendedPriceMin))
                    .col(score(Forecasts::RecommendedPriceMax))
                    .col(ColumnDef::new(Forecasts::PriceElasticity).string_len(16).null())
                    .col(ColumnDef::new(Forecasts::CityRankings).json().null())
                    .col(ColumnDef::new(Forecasts::ProductAnalysisSummary).text().null())
                    .col(ColumnDef::new(Forecasts::MarketAnalysisSummary).text().null())
                    .col(ColumnDef::new(Forecasts::AdvertisingStrategySummary).text().null())
                    .col(ColumnDef::new(Forecasts::SupplyChainSummary).text().null())
                    .col(ColumnDef::new(Forecasts::SalesStrategySummary).text().null())
                    .col(ColumnDef::new(Forecasts::ProductAnalysisData).json().null())
                    .col(ColumnDef::new(Forecasts::MarketAnalysisData).json().null())
                    .col(ColumnDef::new(Forecasts::AdvertisingStrategyData).json().null())
                    .col(ColumnDef::new(Forecasts::SupplyChainData).json().null())
                    .col(ColumnDef::new(Forecasts::SalesStrategyData).json().null())
                    .col(ColumnDef::new(Forecasts::ModelVersion).string_len(64).null())
                    .col(ColumnDef::new(Forecasts::TokensUsed).big_integer().null())
                    .col(score(Forecasts::CostUsd))
                    .col(ts(Forecasts::CreatedAt))
                    .col(ts(Forecasts::UpdatedAt))
                    .foreign_key(&mut owner_fk(
                        "fk_forecasts_user_id",
                        Forecasts::Table,
                        Forecasts::UserId,
                    ))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_forecasts_product_id")
                            .from(Forecasts::Table, Forecasts::ProductId)
                            .to(Products::Table, Products::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_forecasts_target_city_id")
                            .from(Forecasts::Table, Forecasts::TargetCityId)
                            .to(Cities::Table, Cities::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_forecasts_user_id")
                    .table(Forecasts::Table)
                    .col(Forecasts::UserId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_forecasts_status")
                    .table(Forecasts::Table)
                    .col(Forecasts::Status)
                    .to_owned(),
            )
            .await?;

        // agent_logs
        manager
            .create_table(
                Table::create()
                    .table(AgentLogs::Table)
                    .if_not_exists()
                    .col(pk(AgentLogs::Id))
                    .col(ColumnDef::new(AgentLogs::ForecastId).big_integer().not_null())
                    .col(ColumnDef::new(AgentLogs::AgentKind).string_len(32).not_null())
                    .col(ColumnDef::new(AgentLogs::AgentName).string_len(64).not_null())
                    .col(ColumnDef::new(AgentLogs::Status).string_len(16).not_null())
                    .col(
                        ColumnDef::new(AgentLogs::IsSuccessful)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(AgentLogs::ErrorMessage).text().null())
                    .col(ts(AgentLogs::StartedAt))
                    .col(ts_null(AgentLogs::CompletedAt))
                    .col(
                        ColumnDef::new(AgentLogs::ExecutionTimeMs)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(AgentLogs::InputData).json().null())
                    .col(ColumnDef::new(AgentLogs::OutputData).json().null())
                    .col(ColumnDef::new(AgentLogs::Summary).text().null())
                    .col(ColumnDef::new(AgentLogs::ModelName).string_len(64).null())
                    .col(
                        ColumnDef::new(AgentLogs::TokensUsed)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AgentLogs::PromptTokens)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AgentLogs::CompletionTokens)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(AgentLogs::CostUsd)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(ColumnDef::new(AgentLogs::ReasoningSteps).json().null())
                    .col(
                        ColumnDef::new(AgentLogs::ConfidenceScore)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(AgentLogs::RetryCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ts(AgentLogs::CreatedAt))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_agent_logs_forecast_id")
                            .from(AgentLogs::Table, AgentLogs::ForecastId)
                            .to(Forecasts::Table, Forecasts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_agent_logs_forecast_id")
                    .table(AgentLogs::Table)
                    .col(AgentLogs::ForecastId)
                    .to_owned(),
            )
            .await?;

        // api_keys
        manager
            .create_table(
                Table::create()
                    .table(ApiKeys::Table)
                    .if_not_exists()
                    .col(pk(ApiKeys::Id))
                    .col(ColumnDef::new(ApiKeys::UserId).big_integer().not_null())
                    .col(ColumnDef::new(ApiKeys::KeyHash).string().not_null().unique_key())
                    .col(ColumnDef::new(ApiKeys::Name).string().not_null())
                    .col(ColumnDef::new(ApiKeys::Prefix).string_len(10).not_null())
                    .col(
                        ColumnDef::new(ApiKeys::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(ApiKeys::IsRevoked)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ts_null(ApiKeys::LastUsedAt))
                    .col(
                        ColumnDef::new(ApiKeys::UsageCount)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(ApiKeys::RateLimitPerMinute)
                            .integer()
                            .not_null()
                            .default(60),
                    )
                    .col(ts_null(ApiKeys::ExpiresAt))
                    .col(ts(ApiKeys::CreatedAt))
                    .col(ts(ApiKeys::UpdatedAt))
                    .foreign_key(&mut owner_fk(
                        "fk_api_keys_user_id",
                        ApiKeys::Table,
                        ApiKeys::UserId,
                    ))
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("ix_api_keys_prefix")
                    .table(ApiKeys::Table)
                    .col(ApiKeys::Prefix)
                    .to_owned(),
            )
            .await?;

        // payments
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(pk(Payments::Id))
                    .col(ColumnDef::new(Payments::UserId).big_integer().not_null())
                    .col(ColumnDef::new(Payments::PaymentType).string_len(16).not_null())
                    .col(
                        ColumnDef::new(Payments::Status)
                            .string_len(32)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Payments::Amount).big_integer().not_null())
                    .col(
                        ColumnDef::new(Payments::Currency)
                            .string_len(3)
                            .not_null()
                            .default("USD"),
                    )
                    .col(
                        ColumnDef::new(Payments::AmountRefunded)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Payments::Description).string_len(500).null())
                    .col(ColumnDef::new(Payments::ItemName).string().null())
                    .col(
                        ColumnDef::new(Payments::CheckoutSessionId)
                            .string()
                            .null()
                            .unique_key(),
                    )
                    .col(ts_null(Payments::PaidAt))
                    .col(ts(Payments::CreatedAt))
                    .col(ts(Payments::UpdatedAt))
                    .foreign_key(&mut owner_fk(
                        "fk_payments_user_id",
                        Payments::Table,
                        Payments::UserId,
                    ))
                    .to_owned(),
            )
            .await?;

        // deep_reports
        manager
            .create_table(
                Table::create()
                    .table(DeepReports::Table)
                    .if_not_exists()
                    .col(pk(DeepReports::Id))
                    .col(ColumnDef::new(DeepReports::UserId).big_integer().not_null())
                    .col(ColumnDef::new(DeepReports::ForecastId).big_integer().not_null())
                    .col(ColumnDef::new(DeepReports::PaymentId).big_integer().null())
                    .col(ColumnDef::new(DeepReports::ReportType).string_len(16).not_null())
                    .col(ColumnDef::new(DeepReports::PricePaid).double().not_null())
                    .col(
                        ColumnDef::new(DeepReports::Currency)
                            .string_len(3)
                            .not_null()
                            .default("USD"),
                    )
                    .col(ColumnDef::new(DeepReports::ReportData).json().not_null())
                    .col(ColumnDef::new(DeepReports::ExecutiveSummary).text().null())
                    .col(
                        ColumnDef::new(DeepReports::DownloadCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ts(DeepReports::CreatedAt))
                    .col(ts(DeepReports::UpdatedAt))
                    .foreign_key(&mut owner_fk(
                        "fk_deep_reports_user_id",
                        DeepReports::Table,
                        DeepReports::UserId,
                    ))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deep_reports_forecast_id")
                            .from(DeepReports::Table, DeepReports::ForecastId)
                            .to(Forecasts::Table, Forecasts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_deep_reports_payment_id")
                            .from(DeepReports::Table, DeepReports::PaymentId)
                            .to(Payments::Table, Payments::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // reverse dependency order; indexes go with their tables
        for table in [
            DeepReports::Table.into_iden(),
            Payments::Table.into_iden(),
            ApiKeys::Table.into_iden(),
            AgentLogs::Table.into_iden(),
            Forecasts::Table.into_iden(),
            Cities::Table.into_iden(),
            Products::Table.into_iden(),
            Subscriptions::Table.into_iden(),
            Users::Table.into_iden(),
        ] {
            manager
                .drop_table(Table::drop().table(table).if_exists().to_owned())
                .await?;
        }

        Ok(())
    }
}
