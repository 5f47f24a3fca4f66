pub mod game_json;

pub use game_json::{
    handle_request_json, GameRequest, GameRequestType, GameResponse, GameResponseType,
    SCHEMA_VERSION,
};
