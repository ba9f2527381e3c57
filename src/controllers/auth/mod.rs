use actix_web::web::ServiceConfig;

pub mod login;
pub mod logout;
pub mod register;
pub mod validate_password;

pub fn auth_routes(cfg: &mut ServiceConfig) {
    cfg.service(login::login);
    cfg.service(logout::logout);
    cfg.service(register::register);
}
