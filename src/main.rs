#[actix_web::main]
async fn main() -> std::io::Result<()> {
    advance_request_server::run().await
}
