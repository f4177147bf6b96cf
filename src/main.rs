use actix_web::{App, HttpServer, middleware::Logger, web};
use chrono::Local; // timestamp in log lines
use env_logger::{Env, Target};
use std::io::Write; // for env_logger custom formatter

use lumi_backend::{
    config::Config,
    database::{create_pool, run_migrations},
    external::PushGateway,
    handlers,
    middlewares::{AuthMiddleware, create_cors},
    services::*,
    swagger::swagger_config,
    utils::JwtService,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let ts = Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z");
            let level = record.level().as_str().to_ascii_lowercase();
            let msg_json = serde_json::to_string(&format!("{}", record.args()))
                .unwrap_or_else(|_| "\"<invalid utf8>\"".to_string());
            writeln!(
                buf,
                "{{\"timestamp\":\"{}\",\"level\":\"{}\",\"message\":{},\"target\":\"{}\"}}",
                ts,
                level,
                msg_json,
                record.target(),
            )
        })
        .target(Target::Stdout)
        .init();

    // 加载配置
    let config = Config::from_toml().expect("Failed to load configuration file");

    // 创建数据库连接池
    let pool = create_pool(&config.database)
        .await
        .expect("Failed to create database connection pool");

    // 运行数据库迁移
    run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");

    // 创建JWT服务
    let jwt_service = JwtService::new(&config.jwt.secret, config.jwt.access_token_expires_in);

    // 创建外部服务
    let push_gateway = PushGateway::new(config.push.clone());

    // 创建服务
    let ledger_service = LedgerService::new(pool.clone());
    let redemption_service = RedemptionService::new(pool.clone());
    let distribution_service = DistributionService::new(pool.clone());
    let notification_service = NotificationService::new(pool.clone(), push_gateway);

    // 启动后台过期扫描任务（每小时把过窗的券迁移为 expired）
    {
        let sweep_service = redemption_service.clone();
        tokio::spawn(async move {
            loop {
                match sweep_service.expire_lapsed_coupons().await {
                    Ok(0) => {}
                    Ok(count) => log::info!("Expired {count} lapsed coupons"),
                    Err(e) => log::error!("Coupon expiry sweep failed: {e:?}"),
                }
                tokio::time::sleep(std::time::Duration::from_secs(3600)).await;
            }
        });
    }

    // 启动HTTP服务器
    log::info!(
        "Starting HTTP server at {}:{}",
        config.server.host,
        config.server.port
    );

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .wrap(create_cors())
            .wrap(AuthMiddleware::new(jwt_service.clone()))
            .app_data(web::Data::new(ledger_service.clone()))
            .app_data(web::Data::new(redemption_service.clone()))
            .app_data(web::Data::new(distribution_service.clone()))
            .app_data(web::Data::new(notification_service.clone()))
            .configure(swagger_config)
            .service(
                web::scope("/api/v1")
                    .configure(handlers::coupon_config)
                    .configure(handlers::gift_card_config)
                    .configure(handlers::reward_config)
                    .configure(handlers::wallet_config)
                    .configure(handlers::campaign_config),
            )
    })
    .bind((config.server.host.as_str(), config.server.port))?
    .run()
    .await
}
