use creche::creche_auth::{
    create_access_token, create_refresh_token, verify_refresh_token, verify_token,
};
use creche::creche_config::JwtConfig;
use creche::creche_models::UserType;
use uuid::Uuid;

fn get_test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        access_token_expiry: 3600,
        refresh_token_expiry: 604800,
    }
}

#[test]
fn test_access_token_for_every_user_type() {
    let jwt_config = get_test_jwt_config();
    let user_id = Uuid::new_v4();

    for user_type in [
        UserType::Parent,
        UserType::NurseryAssistant,
        UserType::NurseryManager,
        UserType::Admin,
    ] {
        let token = create_access_token(user_id, "camille", user_type, false, &jwt_config).unwrap();
        let claims = verify_token(&token, &jwt_config).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.username, "camille");
        assert_eq!(claims.user_type, user_type);
    }
}

#[test]
fn test_staff_flag_makes_admin() {
    let jwt_config = get_test_jwt_config();
    let token =
        create_access_token(Uuid::new_v4(), "root", UserType::Parent, true, &jwt_config).unwrap();
    let claims = verify_token(&token, &jwt_config).unwrap();
    assert!(claims.is_admin());
}

#[test]
fn test_token_signed_with_other_secret_rejected() {
    let jwt_config = get_test_jwt_config();
    let token =
        create_access_token(Uuid::new_v4(), "camille", UserType::Parent, false, &jwt_config)
            .unwrap();

    let other = JwtConfig {
        secret: "another_secret".to_string(),
        ..get_test_jwt_config()
    };
    let err = verify_token(&token, &other).unwrap_err();
    assert_eq!(err.status, axum::http::StatusCode::UNAUTHORIZED);
}

#[test]
fn test_refresh_and_access_tokens_are_not_interchangeable() {
    let jwt_config = get_test_jwt_config();
    let user_id = Uuid::new_v4();

    let refresh = create_refresh_token(user_id, &jwt_config).unwrap();
    let access =
        create_access_token(user_id, "camille", UserType::Parent, false, &jwt_config).unwrap();

    assert_eq!(
        verify_refresh_token(&refresh, &jwt_config).unwrap().sub,
        user_id.to_string()
    );
    assert!(verify_token(&refresh, &jwt_config).is_err());
    assert!(verify_refresh_token(&access, &jwt_config).is_err());
}
