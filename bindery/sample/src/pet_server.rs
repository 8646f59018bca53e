//! In-memory implementation of the pet store contract.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Mutex;

use bindery::ServiceError;

use crate::petstore::PetstoreSpec;
use crate::petstore::models::{
    AvatarUpload, CreatePetRequest, CreatePetResponse, CustomPet, CustomPetRequest,
    CustomPetResponse, DeletePetResponse, Error, GetAvatarByPetIdResponse,
    GetAvatarByPetIdResponseFileHeaders, ListPetsResponse, ListPetsResponsePetsHeaders, Pet, Pets, RedirectUserResponse,
    RedirectUserResponseRedirectHeaders, ShowPetByIdResponse, UpdateAvatarByIdRequest,
    UpdateAvatarByIdResponse,
};

/// Token accepted by `deletePet`.
pub const BEARER_TOKEN: &str = "Bearer secret";

pub const REDIRECT_LOCATION: &str = "https://google.com";

/// Bytes of every avatar this server hands out.
pub const AVATAR: [u8; 3] = [1, 2, 3];

/// Pet whose avatar note contains a line break and cannot be sent as a header.
pub const UNSENDABLE_NOTE_PET: &str = "unsendable";

/// An avatar upload as the contract saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivedUpload {
    pub pet_id: String,
    pub path: PathBuf,
    pub bytes: Vec<u8>,
    pub description: String,
}

#[derive(Debug, Default)]
struct State {
    pets: BTreeMap<i64, Pet>,
    uploads: Vec<ReceivedUpload>,
    served_files: Vec<PathBuf>,
    custom_pets: Vec<CustomPet>,
}

/// A pet store that starts with a cat and a dog.
#[derive(Debug)]
pub struct PetServer {
    state: Mutex<State>,
}

impl Default for PetServer {
    fn default() -> Self {
        Self::new()
    }
}

fn pet(id: i64, name: &str, tag: &str) -> Pet {
    Pet {
        id,
        name: name.to_string(),
        tag: Some(tag.to_string()),
    }
}

fn error(code: i32, message: &str) -> Error {
    Error {
        code,
        message: message.to_string(),
    }
}

impl PetServer {
    pub fn new() -> Self {
        let pets = [pet(1, "Cat", "orange"), pet(2, "Dog", "black")]
            .into_iter()
            .map(|p| (p.id, p))
            .collect();
        Self {
            state: Mutex::new(State {
                pets,
                ..State::default()
            }),
        }
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut State) -> T) -> Result<T, ServiceError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| ServiceError::new("pet store state is poisoned"))?;
        Ok(f(&mut state))
    }

    /// Avatar uploads received so far.
    pub fn uploads(&self) -> Vec<ReceivedUpload> {
        self.with_state(|s| s.uploads.clone()).unwrap_or_default()
    }

    /// Files handed to the bindings as avatar responses.
    pub fn served_files(&self) -> Vec<PathBuf> {
        self.with_state(|s| s.served_files.clone()).unwrap_or_default()
    }

    pub fn custom_pets(&self) -> Vec<CustomPet> {
        self.with_state(|s| s.custom_pets.clone()).unwrap_or_default()
    }

    pub fn pet(&self, id: i64) -> Option<Pet> {
        self.with_state(|s| s.pets.get(&id).cloned()).ok().flatten()
    }
}

impl PetstoreSpec for PetServer {
    async fn list_pets(&self, limit: Option<i32>) -> Result<ListPetsResponse, ServiceError> {
        if let Some(limit) = limit.filter(|l| *l <= 0) {
            tracing::debug!(limit, "rejecting page size");
            return Ok(ListPetsResponse::Error {
                error: error(400, "Limit <= 0"),
            });
        }

        let all: Vec<Pet> = self.with_state(|s| s.pets.values().cloned().collect())?;
        let page_size = limit.map_or(all.len(), |l| l as usize);
        let x_next = (all.len() > page_size).then(|| format!("/pets?offset={}", page_size));
        Ok(ListPetsResponse::Pets {
            pets: Pets {
                pets: all.into_iter().take(page_size).collect(),
            },
            list_pets_response_pets_headers: ListPetsResponsePetsHeaders { x_next },
        })
    }

    async fn create_pet(&self, request_body: CreatePetRequest) -> Result<CreatePetResponse, ServiceError> {
        let pet = match request_body {
            CreatePetRequest::Json { pet } | CreatePetRequest::Form { pet } => pet,
            CreatePetRequest::Xml { .. } => {
                return Ok(CreatePetResponse::Error {
                    error: error(415, "XML pets are not accepted"),
                });
            }
        };
        if pet.name.trim().is_empty() {
            return Ok(CreatePetResponse::Error {
                error: error(422, "A pet needs a name"),
            });
        }

        let created = self.with_state(|s| {
            if s.pets.contains_key(&pet.id) {
                false
            } else {
                s.pets.insert(pet.id, pet);
                true
            }
        })?;
        if created {
            Ok(CreatePetResponse::Created)
        } else {
            Ok(CreatePetResponse::Error {
                error: error(409, "Pet already exists"),
            })
        }
    }

    async fn show_pet_by_id(&self, pet_id: String, x_version: i32) -> Result<ShowPetByIdResponse, ServiceError> {
        tracing::debug!(pet_id = %pet_id, x_version, "looking up pet");
        let found = match pet_id.parse::<i64>() {
            Ok(id) => self.with_state(|s| s.pets.get(&id).cloned())?,
            Err(_) => None,
        };
        Ok(match found {
            Some(pet) => ShowPetByIdResponse::Pet { pet },
            None => ShowPetByIdResponse::Error {
                error: error(404, "Pet not found"),
            },
        })
    }

    async fn delete_pet(&self, authorization: String, pet_id: String) -> Result<DeletePetResponse, ServiceError> {
        if authorization != BEARER_TOKEN {
            return Ok(DeletePetResponse::Error {
                error: error(401, "Unauthorized"),
            });
        }
        let Ok(id) = pet_id.parse::<i64>() else {
            return Ok(DeletePetResponse::NotFound);
        };
        let removed = self.with_state(|s| s.pets.remove(&id))?;
        Ok(match removed {
            Some(_) => DeletePetResponse::NoContent,
            None => DeletePetResponse::NotFound,
        })
    }

    async fn get_avatar_by_pet_id(&self, pet_id: String) -> Result<GetAvatarByPetIdResponse, ServiceError> {
        let temp = tempfile::Builder::new()
            .prefix(&format!("avatar-{}-", pet_id))
            .suffix(".bin")
            .tempfile()?;
        let (_, path) = temp.keep().map_err(|e| e.error)?;
        tokio::fs::write(&path, AVATAR).await?;

        self.with_state(|s| s.served_files.push(path.clone()))?;
        let x_avatar_note = if pet_id == UNSENDABLE_NOTE_PET {
            "first line\nsecond line".to_string()
        } else {
            format!("avatar of pet {}", pet_id)
        };
        Ok(GetAvatarByPetIdResponse::File {
            file: path,
            get_avatar_by_pet_id_response_file_headers: GetAvatarByPetIdResponseFileHeaders {
                x_avatar_note: Some(x_avatar_note),
            },
        })
    }

    async fn update_avatar_by_id(
        &self,
        pet_id: String,
        request_body: UpdateAvatarByIdRequest,
    ) -> Result<UpdateAvatarByIdResponse, ServiceError> {
        let UpdateAvatarByIdRequest::MultipartForm {
            avatar_upload: AvatarUpload { photo, description },
        } = request_body;

        let bytes = tokio::fs::read(&photo.file).await?;
        self.with_state(|s| {
            s.uploads.push(ReceivedUpload {
                pet_id: pet_id.clone(),
                path: photo.file.clone(),
                bytes,
                description: description.clone(),
            })
        })?;

        if description == "fail" {
            return Err(ServiceError::new("avatar storage failed"));
        }
        Ok(UpdateAvatarByIdResponse::Ok)
    }

    async fn redirect_user(&self) -> Result<RedirectUserResponse, ServiceError> {
        Ok(RedirectUserResponse::Redirect {
            redirect_user_response_redirect_headers: RedirectUserResponseRedirectHeaders {
                location: REDIRECT_LOCATION.to_string(),
            },
        })
    }

    async fn custom_pet(&self, request_body: CustomPetRequest) -> Result<CustomPetResponse, ServiceError> {
        let CustomPetRequest::Json { custom_pet } = request_body;
        self.with_state(|s| s.custom_pets.push(custom_pet))?;
        Ok(CustomPetResponse::Ok)
    }
}
