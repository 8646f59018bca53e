//! Serves the generated bindings on a local port and calls them through the
//! generated client and through raw HTTP.

use std::collections::BTreeSet;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use bindery::ClientError;
use bindery_sample::pet_server::{AVATAR, BEARER_TOKEN, REDIRECT_LOCATION, UNSENDABLE_NOTE_PET};
use bindery_sample::petstore::models::{
    AvatarUpload, CreatePetRequest, CreatePetResponse, CustomPet, CustomPetRequest,
    CustomPetResponse, DeletePetResponse, Error, FileUpload, GetAvatarByPetIdResponse,
    ListPetsResponse, Pet, RedirectUserResponse, ShowPetByIdResponse, UpdateAvatarByIdRequest,
    UpdateAvatarByIdResponse,
};
use bindery_sample::petstore::{PetstoreClient, PetstoreController};
use bindery_sample::PetServer;
use reqwest::StatusCode;
use serde_json::{Value, json};

struct TestServer {
    addr: SocketAddr,
    server: Arc<PetServer>,
}

impl TestServer {
    async fn start() -> Self {
        let server = Arc::new(PetServer::new());
        let router = PetstoreController::from_arc(Arc::clone(&server)).into_router();
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        Self { addr, server }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    fn client(&self) -> PetstoreClient {
        PetstoreClient::new(self.url("")).unwrap()
    }
}

fn raw() -> reqwest::Client {
    bindery::client::http_client().unwrap()
}

fn photo_part() -> reqwest::multipart::Part {
    reqwest::multipart::Part::bytes(vec![9u8, 8, 7])
        .file_name("photo.jpg")
        .mime_str("image/jpeg")
        .unwrap()
}

/// Multipart files currently stored in the system temp directory.
fn stored_parts() -> BTreeSet<PathBuf> {
    std::fs::read_dir(std::env::temp_dir())
        .unwrap()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_name().to_string_lossy().starts_with("bindery-part-"))
        .map(|entry| entry.path())
        .collect()
}

async fn bad_request_details(response: reqwest::Response) -> Value {
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["title"], "Bad Request");
    assert_eq!(body["status"], 400);
    body["details"].clone()
}

#[tokio::test]
async fn test_list_pets_with_client() {
    let server = TestServer::start().await;
    let client = server.client();

    let ListPetsResponse::Pets {
        pets,
        list_pets_response_pets_headers,
    } = client.list_pets(None).await.unwrap()
    else {
        panic!("expected pets");
    };
    let names: Vec<_> = pets.pets.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["Cat", "Dog"]);
    assert_eq!(list_pets_response_pets_headers.x_next, None);

    let ListPetsResponse::Pets {
        list_pets_response_pets_headers,
        ..
    } = client.list_pets(Some(1)).await.unwrap()
    else {
        panic!("expected pets");
    };
    assert_eq!(list_pets_response_pets_headers.x_next.as_deref(), Some("/pets?offset=1"));
}

#[tokio::test]
async fn test_default_response_uses_body_code() {
    let server = TestServer::start().await;

    let response = raw().get(server.url("/pets?limit=0")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({ "code": 400, "message": "Limit <= 0" }));

    let response = server.client().list_pets(Some(-1)).await.unwrap();
    assert_eq!(
        response,
        ListPetsResponse::Error {
            error: Error {
                code: 400,
                message: "Limit <= 0".into()
            }
        }
    );
}

#[tokio::test]
async fn test_pets_wire_format() {
    let server = TestServer::start().await;
    let response = raw().get(server.url("/pets?limit=10")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get("x-next").is_none());

    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "pets": [
                { "id": 1, "name": "Cat", "tag": "orange" },
                { "id": 2, "name": "Dog", "tag": "black" }
            ]
        })
    );

    let response = raw().get(server.url("/pets?limit=1")).send().await.unwrap();
    assert_eq!(response.headers().get_all("x-next").iter().count(), 1);
    assert_eq!(response.headers()["x-next"], "/pets?offset=1");
}

#[tokio::test]
async fn test_bad_param_format() {
    let server = TestServer::start().await;
    let response = raw().get(server.url("/pets?limit=ten")).send().await.unwrap();
    assert_eq!(
        bad_request_details(response).await,
        json!({ "type": "badParamFormat", "paramName": "limit" })
    );
}

#[tokio::test]
async fn test_missing_required_header() {
    let server = TestServer::start().await;
    let response = raw().get(server.url("/pets/1")).send().await.unwrap();
    assert_eq!(
        bad_request_details(response).await,
        json!({ "type": "noParamFound", "paramName": "x-version" })
    );
}

#[tokio::test]
async fn test_non_ascii_required_header_is_bad_format() {
    let server = TestServer::start().await;
    let response = raw()
        .get(server.url("/pets/1"))
        .header("x-version", reqwest::header::HeaderValue::from_bytes(b"v\xe9").unwrap())
        .send()
        .await
        .unwrap();
    assert_eq!(
        bad_request_details(response).await,
        json!({ "type": "badParamFormat", "paramName": "x-version" })
    );
}

#[tokio::test]
async fn test_show_pet_by_id() {
    let server = TestServer::start().await;
    let client = server.client();

    let response = client.show_pet_by_id("1".into(), 2).await.unwrap();
    assert_eq!(
        response,
        ShowPetByIdResponse::Pet {
            pet: Pet {
                id: 1,
                name: "Cat".into(),
                tag: Some("orange".into())
            }
        }
    );

    let response = raw()
        .get(server.url("/pets/99"))
        .header("x-version", "1")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_pet_json_and_form() {
    let server = TestServer::start().await;
    let client = server.client();

    let tiger = Pet {
        id: 3,
        name: "Tiger".into(),
        tag: None,
    };
    let response = client
        .create_pet(CreatePetRequest::Json { pet: tiger.clone() })
        .await
        .unwrap();
    assert_eq!(response, CreatePetResponse::Created);
    assert_eq!(server.server.pet(3), Some(tiger));

    let response = raw()
        .post(server.url("/pets"))
        .header("content-type", "application/x-www-form-urlencoded")
        .body("id=4&name=Lion&tag=big")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(server.server.pet(4).and_then(|p| p.tag), Some("big".into()));
}

#[tokio::test]
async fn test_missing_body() {
    let server = TestServer::start().await;
    let response = raw().post(server.url("/pets")).send().await.unwrap();
    assert_eq!(bad_request_details(response).await, json!({ "type": "noBodyFound" }));

    let response = raw()
        .post(server.url("/pets"))
        .header("content-type", "text/plain")
        .body("Tiger")
        .send()
        .await
        .unwrap();
    assert_eq!(bad_request_details(response).await, json!({ "type": "noBodyFound" }));
}

#[tokio::test]
async fn test_illegal_body() {
    let server = TestServer::start().await;

    let response = raw()
        .post(server.url("/pets"))
        .header("content-type", "application/json")
        .body("{\"id\": \"three\"}")
        .send()
        .await
        .unwrap();
    assert_eq!(bad_request_details(response).await, json!({ "type": "illegalBody" }));

    let response = raw()
        .post(server.url("/pets"))
        .header("content-type", "application/xml")
        .body("<pet><id>3</id><name>Tiger</name></pet>")
        .send()
        .await
        .unwrap();
    assert_eq!(bad_request_details(response).await, json!({ "type": "illegalBody" }));
}

#[tokio::test]
async fn test_client_refuses_xml() {
    let server = TestServer::start().await;
    let err = server
        .client()
        .create_pet(CreatePetRequest::Xml {
            pet: Pet {
                id: 5,
                name: "Owl".into(),
                tag: None,
            },
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ClientError::UnsupportedMediaType(m) if m == "application/xml"));
}

#[tokio::test]
async fn test_delete_pet_with_bearer_token() {
    let server = TestServer::start().await;
    let client = server.client();

    let response = raw().delete(server.url("/pets/1")).send().await.unwrap();
    assert_eq!(
        bad_request_details(response).await,
        json!({ "type": "noParamFound", "paramName": "Authorization" })
    );

    let response = client.delete_pet(BEARER_TOKEN.into(), "1".into()).await.unwrap();
    assert_eq!(response, DeletePetResponse::NoContent);
    let response = client.delete_pet(BEARER_TOKEN.into(), "1".into()).await.unwrap();
    assert_eq!(response, DeletePetResponse::NotFound);

    let response = client.delete_pet("Bearer wrong".into(), "2".into()).await.unwrap();
    assert!(matches!(response, DeletePetResponse::Error { error } if error.code == 401));
}

#[tokio::test]
async fn test_redirect_is_not_followed() {
    let server = TestServer::start().await;

    let response = raw().get(server.url("/redirect")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()["location"], REDIRECT_LOCATION);

    let response = server.client().redirect_user().await.unwrap();
    let RedirectUserResponse::Redirect {
        redirect_user_response_redirect_headers,
    } = response;
    assert_eq!(redirect_user_response_redirect_headers.location, REDIRECT_LOCATION);
}

#[tokio::test]
async fn test_avatar_download_deletes_served_file() {
    let server = TestServer::start().await;

    let response = raw().get(server.url("/pets/1/avatar")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-avatar-note"], "avatar of pet 1");
    assert_eq!(response.bytes().await.unwrap().as_ref(), AVATAR);

    let GetAvatarByPetIdResponse::File {
        file,
        get_avatar_by_pet_id_response_file_headers,
    } = server.client().get_avatar_by_pet_id("1".into()).await.unwrap();
    assert_eq!(std::fs::read(&file).unwrap(), AVATAR);
    assert_eq!(
        get_avatar_by_pet_id_response_file_headers.x_avatar_note.as_deref(),
        Some("avatar of pet 1")
    );
    std::fs::remove_file(file).unwrap();

    let served = server.server.served_files();
    assert_eq!(served.len(), 2);
    assert!(served.iter().all(|path| !path.exists()));
}

#[tokio::test]
async fn test_avatar_with_unsendable_header_is_still_deleted() {
    let server = TestServer::start().await;

    let url = server.url(&format!("/pets/{}/avatar", UNSENDABLE_NOTE_PET));
    let response = raw().get(url).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let served = server.server.served_files();
    assert_eq!(served.len(), 1);
    assert!(!served[0].exists());
}

#[tokio::test]
#[serial_test::serial(uploads)]
async fn test_avatar_upload_is_cleaned_up() {
    let server = TestServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let photo = dir.path().join("photo.jpg");
    std::fs::write(&photo, [9u8, 8, 7]).unwrap();

    let upload = UpdateAvatarByIdRequest::MultipartForm {
        avatar_upload: AvatarUpload {
            photo: FileUpload {
                name: "photo.jpg".into(),
                file: photo.clone(),
                content_type: "image/jpeg".into(),
            },
            description: "new".into(),
        },
    };

    let client = server.client();
    let response = client.update_avatar_by_id("1".into(), upload).await.unwrap();
    assert_eq!(response, UpdateAvatarByIdResponse::Ok);

    // The error response has no body, so the raw status is checked.
    let form = reqwest::multipart::Form::new()
        .part("photo", photo_part())
        .text("description", "fail");
    let response = raw()
        .put(server.url("/pets/1/avatar"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let uploads = server.server.uploads();
    assert_eq!(uploads.len(), 2);
    for received in &uploads {
        assert_eq!(received.pet_id, "1");
        assert_eq!(received.bytes, vec![9, 8, 7]);
        assert!(!received.path.exists());
    }
    assert!(photo.exists());
}

#[tokio::test]
#[serial_test::serial(uploads)]
async fn test_multipart_without_file() {
    let server = TestServer::start().await;
    let form = reqwest::multipart::Form::new().text("description", "no photo");
    let response = raw()
        .put(server.url("/pets/1/avatar"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(bad_request_details(response).await, json!({ "type": "illegalBody" }));
    assert!(server.server.uploads().is_empty());
}

#[tokio::test]
#[serial_test::serial(uploads)]
async fn test_multipart_without_required_text_stores_nothing() {
    let server = TestServer::start().await;
    let before = stored_parts();

    let form = reqwest::multipart::Form::new().part("photo", photo_part());
    let response = raw()
        .put(server.url("/pets/1/avatar"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(bad_request_details(response).await, json!({ "type": "illegalBody" }));
    assert!(server.server.uploads().is_empty());

    let created: Vec<_> = stored_parts().difference(&before).cloned().collect();
    assert!(created.is_empty(), "multipart files left behind: {:?}", created);
}

#[tokio::test]
async fn test_custom_pet_lists() {
    let server = TestServer::start().await;
    let custom = CustomPet {
        ints: vec![1, 2, 3],
        strings: vec!["a".into(), "b".into()],
    };
    let response = server
        .client()
        .custom_pet(CustomPetRequest::Json {
            custom_pet: custom.clone(),
        })
        .await
        .unwrap();
    assert_eq!(response, CustomPetResponse::Ok);
    assert_eq!(server.server.custom_pets(), vec![custom]);
}
