use std::fs;
use std::path::Path;

use fastclient_core::GeneratedFile;
use fastclient_core::config::ClientKind;
use fastclient_core::parse;
use fastclient_python::ProjectGenerator;

const PETSTORE: &str = include_str!("../../fastclient-core/tests/fixtures/petstore.yaml");

fn render(yaml: &str, kind: ClientKind) -> Vec<GeneratedFile> {
    let spec = parse::from_yaml(yaml).unwrap();
    ProjectGenerator::new(&spec, Path::new("out"), "petstore", kind)
        .unwrap()
        .render()
        .unwrap()
}

fn file<'a>(files: &'a [GeneratedFile], path: &str) -> &'a str {
    &files
        .iter()
        .find(|f| f.path == path)
        .unwrap_or_else(|| panic!("{path} was not generated"))
        .content
}

#[test]
fn test_petstore_file_set() {
    let files = render(PETSTORE, ClientKind::Sync);
    let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();
    assert_eq!(
        paths,
        vec![
            "managers/pet.py",
            "managers/store.py",
            "managers/user.py",
            "models.py"
        ]
    );
}

#[test]
fn test_single_get_with_path_parameter() {
    let yaml = r#"
openapi: "3.0.3"
info: {title: Pets, version: "1"}
paths:
  /pet/{petId}:
    get:
      operationId: getPetById
      tags: [pet]
      parameters:
        - name: petId
          in: path
          required: true
          schema:
            type: integer
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Pet'
components:
  schemas:
    Pet:
      type: object
      properties:
        name:
          type: string
"#;
    let files = render(yaml, ClientKind::Sync);
    let manager = file(&files, "managers/pet.py");
    assert!(manager.contains("from ..models import (\n    Pet,\n)\n"));
    assert!(manager.contains("class PetManager:\n"));
    // __init__, session and the one operation
    assert_eq!(manager.matches("    def ").count(), 3);
    assert!(manager.ends_with(
        r#"    def get_pet_by_id(self, pet_id: int, **kwargs) -> Optional[Pet]:
        url = f"{self.base_url}/pet/{pet_id}"

        with self.session as session:
            response_obj = session.get(url=url, **kwargs)

        if response_obj.ok:
            return Pet(**response_obj.json())
        return None
"#
    ));
}

#[test]
fn test_array_response_builds_each_item() {
    let files = render(PETSTORE, ClientKind::Sync);
    let manager = file(&files, "managers/pet.py");
    assert!(manager.contains(
        "def find_pets_by_status(self, params: Optional[PetQueryFindPetsByStatusQuery] = None, **kwargs) -> Optional[list[Pet]]:"
    ));
    assert!(manager.contains("return [Pet(**obj) for obj in response_obj.json()]"));
}

#[test]
fn test_query_models_land_in_models_module() {
    let files = render(PETSTORE, ClientKind::Sync);
    let models = file(&files, "models.py");
    assert!(models.contains("class PetQueryFindPetsByStatusQuery(BaseModel):"));
    assert!(models.contains(
        "    #: Status values that need to be considered for filter\n    status: Optional[Literal[\"available\", \"pending\", \"sold\"]] = None"
    ));
    assert!(models.contains("class UserQueryLoginUserQuery(BaseModel):"));
    assert!(models.contains("    username: str\n"));
    assert!(models.contains("    #: The parameter description is missing\n    password: Optional[str] = None"));

    // Schemas come first, query models after them.
    let pet = models.find("class Pet(BaseModel):").unwrap();
    let query = models.find("class PetQueryFindPetsByStatusQuery").unwrap();
    assert!(pet < query);
}

#[test]
fn test_query_model_names_are_deterministic() {
    let first = render(PETSTORE, ClientKind::Sync);
    let second = render(PETSTORE, ClientKind::Sync);
    assert_eq!(first, second);
}

#[test]
fn test_required_query_makes_container_required() {
    let files = render(PETSTORE, ClientKind::Sync);
    let manager = file(&files, "managers/user.py");
    assert!(manager.contains("def login_user(self, params: UserQueryLoginUserQuery, **kwargs) -> Optional[str]:"));
    assert!(manager.contains("return response_obj.json()"));
}

#[test]
fn test_component_refs_are_followed() {
    let files = render(PETSTORE, ClientKind::Sync);
    let manager = file(&files, "managers/store.py");
    assert!(manager.contains(
        "def place_order(self, req_data: Order, **kwargs) -> Optional[Order]:"
    ));
    assert!(manager.contains(
        r#"json=req_data.model_dump(mode="json", exclude_unset=True, by_alias=True), **kwargs"#
    ));
    assert!(manager.contains(
        "def get_order_by_id(self, order_id: int, **kwargs) -> Optional[Order]:"
    ));
    assert!(manager.contains(
        "def get_inventory(self, **kwargs) -> Optional[dict[str, int]]:"
    ));
    assert!(manager.contains("from ..models import (\n    Order,\n)\n"));
}

#[test]
fn test_header_parameters_are_ignored() {
    let files = render(PETSTORE, ClientKind::Sync);
    let manager = file(&files, "managers/pet.py");
    assert!(manager.contains("def delete_pet(self, pet_id: int, **kwargs) -> Optional[Any]:"));
    assert!(!manager.contains("api_key"));
}

#[test]
fn test_async_managers() {
    let files = render(PETSTORE, ClientKind::Async);
    let manager = file(&files, "managers/pet.py");
    assert!(manager.starts_with("from typing import Any, Final, Optional\n\nimport aiohttp\n"));
    assert!(manager.contains("async def get_pet_by_id(self, pet_id: int, **kwargs) -> Optional[Pet]:"));
    assert!(manager.contains("async with session.get(url, **kwargs) as resp:"));
    assert!(manager.contains("data = await resp.json()\n                    return Pet(**data)"));
    assert!(!manager.contains("requests"));
}

#[test]
fn test_models_module_contents() {
    let files = render(PETSTORE, ClientKind::Sync);
    let models = file(&files, "models.py");
    assert!(models.starts_with("from __future__ import annotations\n"));
    assert!(models.contains(
        "class OrderStatus(str, Enum):\n    \"\"\"\n    Order Status\n    \"\"\"\n    Placed = \"placed\"\n"
    ));
    assert!(models.contains("    photo_urls: list[str] = Field(alias=\"photoUrls\")\n"));
    assert!(models.contains("    status: Optional[OrderStatus] = None\n"));
}

#[test]
fn test_generate_writes_package() {
    let spec = parse::from_yaml(PETSTORE).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let written = ProjectGenerator::new(&spec, dir.path(), "petstore", ClientKind::Sync)
        .unwrap()
        .generate()
        .unwrap();
    assert_eq!(written.len(), 4);

    let root = dir.path().join("petstore");
    for path in [
        "__init__.py",
        "models.py",
        "managers/__init__.py",
        "managers/pet.py",
        "managers/store.py",
        "managers/user.py",
    ] {
        assert!(root.join(path).is_file(), "{path} missing");
    }
    let pet = fs::read_to_string(root.join("managers/pet.py")).unwrap();
    assert!(pet.contains("class PetManager:"));
}

#[test]
fn test_custom_models_import() {
    let spec = parse::from_yaml(PETSTORE).unwrap();
    let files = ProjectGenerator::new(&spec, Path::new("out"), "petstore", ClientKind::Sync)
        .unwrap()
        .with_models_import("petstore.models")
        .render()
        .unwrap();
    insta::assert_snapshot!(
        file(&files, "managers/user.py").lines().nth(4).unwrap(),
        @"from petstore.models import ("
    );
}

#[test]
fn test_generating_twice_is_stable() {
    let spec = parse::from_yaml(PETSTORE).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let generator =
        ProjectGenerator::new(&spec, dir.path(), "petstore", ClientKind::Sync).unwrap();
    generator.generate().unwrap();
    let first = fs::read_to_string(dir.path().join("petstore/managers/pet.py")).unwrap();
    generator.generate().unwrap();
    let second = fs::read_to_string(dir.path().join("petstore/managers/pet.py")).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        fs::read_to_string(dir.path().join("petstore/__init__.py")).unwrap(),
        ""
    );
}

#[test]
fn test_inline_enum_annotations_import_literal() {
    let yaml = r#"
openapi: "3.0.3"
info: {title: Pets, version: "1"}
paths:
  /pet/{kind}:
    get:
      operationId: listByKind
      tags: [pet]
      parameters:
        - name: kind
          in: path
          required: true
          schema:
            type: string
            enum: [cat, dog]
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema:
                type: array
                items:
                  type: string
                  enum: [cat, dog]
components:
  schemas: {}
"#;
    for kind in [ClientKind::Sync, ClientKind::Async] {
        let files = render(yaml, kind);
        let manager = file(&files, "managers/pet.py");
        assert!(manager.starts_with("from typing import Any, Final, Literal, Optional\n"));
        assert!(manager.contains(
            r#"def list_by_kind(self, kind: Literal["cat", "dog"], **kwargs) -> Optional[list[Literal["cat", "dog"]]]:"#
        ));
    }
}

#[test]
fn test_enum_and_alias_components() {
    let yaml = r#"
openapi: "3.0.3"
info: {title: Store, version: "1"}
paths:
  /status:
    get:
      operationId: getStatus
      tags: [store]
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Status'
  /names:
    put:
      operationId: putNames
      tags: [store]
      requestBody:
        content:
          application/json:
            schema:
              $ref: '#/components/schemas/Names'
      responses:
        "200":
          description: ok
          content:
            application/json:
              schema:
                $ref: '#/components/schemas/Names'
components:
  schemas:
    Status:
      type: string
      enum: [available, sold]
    Names:
      type: array
      items:
        type: string
"#;
    let files = render(yaml, ClientKind::Sync);
    let manager = file(&files, "managers/store.py");
    assert!(manager.contains(
        "import requests\nfrom pydantic import TypeAdapter\n\nfrom ..models import (\n    Names,\n    Status,\n)\n"
    ));
    assert!(manager.contains("return Status(response_obj.json())"));
    assert!(manager.contains(
        r#"json=TypeAdapter(Names).dump_python(req_data, mode="json", exclude_unset=True, by_alias=True), **kwargs"#
    ));
    assert!(manager.contains("return TypeAdapter(Names).validate_python(response_obj.json())"));
    assert!(!manager.contains("Status(**"));
    assert!(!manager.contains("Names(**"));

    let models = file(&files, "models.py");
    assert!(models.contains("class Status(str, Enum):"));
    assert!(models.contains("Names = list[str]"));

    let files = render(yaml, ClientKind::Async);
    let manager = file(&files, "managers/store.py");
    assert!(manager.contains("return Status(data)"));
    assert!(manager.contains("return TypeAdapter(Names).validate_python(data)"));
}

#[test]
fn test_undeclared_path_placeholder_fails() {
    let yaml = r#"
openapi: "3.0.3"
info: {title: Pets, version: "1"}
paths:
  /pet/{petId}:
    get:
      operationId: getPet
      tags: [pet]
      responses: {}
components:
  schemas: {}
"#;
    let spec = parse::from_yaml(yaml).unwrap();
    let err = ProjectGenerator::new(&spec, Path::new("out"), "petstore", ClientKind::Sync)
        .unwrap()
        .render()
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "/pet/{petId}: placeholder '{petId}' has no matching path parameter"
    );
}
