use serde_json::{Map, Value};
use tracing::{debug, info};

use super::error::CommandError;
use super::parser::{parse_params, unquote, Command, CommandParser, Operation};
use super::result::CommandResult;
use crate::models::{AttributePolicy, Entity, Kind};
use crate::storage::FileStorage;

/// Interprets command lines against a `FileStorage`.
pub struct CommandEngine {
    storage: FileStorage,
    parser: CommandParser,
    policy: AttributePolicy,
}

impl CommandEngine {
    pub fn new(storage: FileStorage, policy: AttributePolicy) -> Self {
        CommandEngine {
            storage,
            parser: CommandParser::new(),
            policy,
        }
    }

    pub fn storage(&self) -> &FileStorage {
        &self.storage
    }

    pub fn execute(&mut self, line: &str) -> Result<CommandResult, CommandError> {
        match self.parser.parse(line) {
            Command::Run { op, args } => {
                let unquoted: Vec<String> = args.iter().map(|arg| unquote(arg)).collect();
                match op {
                    // create needs the quotes to know which values get underscores replaced
                    Operation::Create => self.execute_create(&args),
                    Operation::Show => self.execute_show(&unquoted),
                    Operation::Destroy => self.execute_destroy(&unquoted),
                    Operation::All => self.execute_all(&unquoted),
                    Operation::Count => self.execute_count(&unquoted),
                    Operation::Update => self.execute_update(&unquoted),
                }
            }
            Command::UpdateDict { kind, id, attrs } => self.execute_update_dict(&kind, &id, &attrs),
            Command::Unknown(line) => Err(CommandError::UnknownSyntax(line)),
        }
    }

    fn execute_create(&mut self, args: &[String]) -> Result<CommandResult, CommandError> {
        let kind = self.kind_arg(args)?;

        let mut entity = Entity::new(kind);
        for param in parse_params(&args[1..]) {
            entity.set_attr(&param.name, &param.value, self.policy)?;
        }

        let id = entity.id().to_string();
        info!(key = %entity.key(), "created entity");
        self.storage.register(entity);
        self.storage.persist()?;
        Ok(CommandResult::Created(id))
    }

    fn execute_show(&mut self, args: &[String]) -> Result<CommandResult, CommandError> {
        let key = self.key_arg(args)?;
        let entity = self.storage.get(&key).ok_or(CommandError::NoInstanceFound)?;
        Ok(CommandResult::Shown(entity.to_string()))
    }

    fn execute_destroy(&mut self, args: &[String]) -> Result<CommandResult, CommandError> {
        let key = self.key_arg(args)?;
        if self.storage.remove(&key).is_none() {
            return Err(CommandError::NoInstanceFound);
        }
        self.storage.persist()?;
        info!(key = %key, "destroyed entity");
        Ok(CommandResult::Destroyed)
    }

    fn execute_all(&mut self, args: &[String]) -> Result<CommandResult, CommandError> {
        let listed = match args.first() {
            None => self.storage.all().values().map(|e| e.to_string()).collect(),
            Some(name) => {
                let kind = self.lookup_kind(name)?;
                self.storage.of_kind(kind).map(|e| e.to_string()).collect()
            }
        };
        Ok(CommandResult::Listed(listed))
    }

    fn execute_count(&mut self, args: &[String]) -> Result<CommandResult, CommandError> {
        let kind = self.kind_arg(args)?;
        Ok(CommandResult::Counted(self.storage.count(kind)))
    }

    fn execute_update(&mut self, args: &[String]) -> Result<CommandResult, CommandError> {
        let key = self.key_arg(args)?;
        if self.storage.get(&key).is_none() {
            return Err(CommandError::NoInstanceFound);
        }
        let attr = args.get(2).ok_or(CommandError::AttributeNameMissing)?;
        let value = args.get(3).ok_or(CommandError::ValueMissing)?;

        let policy = self.policy;
        let entity = self
            .storage
            .get_mut(&key)
            .ok_or(CommandError::NoInstanceFound)?;
        // set_attr validates before it writes, so a failure leaves the entity untouched
        entity.set_attr(attr, value, policy)?;
        entity.touch();

        self.storage.persist()?;
        debug!(key = %key, attr = %attr, "updated entity");
        Ok(CommandResult::Updated)
    }

    fn execute_update_dict(
        &mut self,
        kind: &str,
        id: &str,
        attrs: &Map<String, Value>,
    ) -> Result<CommandResult, CommandError> {
        let kind = self.lookup_kind(kind)?;
        if id.is_empty() {
            return Err(CommandError::InstanceIdMissing);
        }
        let key = format!("{}.{}", kind, id);
        let current = self.storage.get(&key).ok_or(CommandError::NoInstanceFound)?;
        if attrs.is_empty() {
            return Err(CommandError::AttributeNameMissing);
        }

        // work on a copy so one bad pair leaves the stored entity as it was
        let mut updated = current.clone();
        for (name, value) in attrs {
            updated.set_json_attr(name, value, self.policy)?;
        }
        updated.touch();
        self.storage.register(updated);

        self.storage.persist()?;
        debug!(key = %key, attrs = attrs.len(), "updated entity");
        Ok(CommandResult::Updated)
    }

    fn kind_arg(&self, args: &[String]) -> Result<Kind, CommandError> {
        let name = args.first().ok_or(CommandError::ClassNameMissing)?;
        self.lookup_kind(name)
    }

    fn key_arg(&self, args: &[String]) -> Result<String, CommandError> {
        let kind = self.kind_arg(args)?;
        let id = args.get(1).ok_or(CommandError::InstanceIdMissing)?;
        Ok(format!("{}.{}", kind, id))
    }

    fn lookup_kind(&self, name: &str) -> Result<Kind, CommandError> {
        self.storage
            .registry()
            .lookup(name)
            .map_err(|_| CommandError::ClassDoesNotExist)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AttrValue;
    use crate::storage::FileStorage;
    use tempfile::TempDir;

    fn engine_in(dir: &TempDir) -> CommandEngine {
        let storage = FileStorage::open(dir.path().join("file.json")).unwrap();
        CommandEngine::new(storage, AttributePolicy::Permissive)
    }

    fn created_id(result: CommandResult) -> String {
        match result {
            CommandResult::Created(id) => id,
            other => panic!("expected created, got {:?}", other),
        }
    }

    #[test]
    fn test_create_then_show_every_kind() {
        let temp_dir = TempDir::new().unwrap();
        let mut engine = engine_in(&temp_dir);

        for kind in Kind::ALL {
            let id = created_id(engine.execute(&format!("create {}", kind)).unwrap());
            match engine.execute(&format!("show {} {}", kind, id)).unwrap() {
                CommandResult::Shown(shown) => {
                    assert!(shown.contains(kind.name()));
                    assert!(shown.contains(&id));
                }
                other => panic!("expected shown, got {:?}", other),
            }
        }
    }

    #[test]
    fn test_validation_order() {
        let temp_dir = TempDir::new().unwrap();
        let mut engine = engine_in(&temp_dir);
        let id = created_id(engine.execute("create User").unwrap());

        let cases = [
            ("create", "** class name missing **"),
            ("create Ghost", "** class doesn't exist **"),
            ("show", "** class name missing **"),
            ("show Ghost 1", "** class doesn't exist **"),
            ("show User", "** instance id missing **"),
            ("show User nope", "** no instance found **"),
            ("destroy User", "** instance id missing **"),
            ("destroy User nope", "** no instance found **"),
            ("count", "** class name missing **"),
            ("count Ghost", "** class doesn't exist **"),
            ("all Ghost", "** class doesn't exist **"),
            ("update", "** class name missing **"),
            ("update Ghost", "** class doesn't exist **"),
            ("update User", "** instance id missing **"),
            ("update User nope first_name Ada", "** no instance found **"),
        ];
        for (line, message) in cases {
            let err = engine.execute(line).unwrap_err();
            assert_eq!(err.to_string(), message, "line: {}", line);
        }

        let err = engine.execute(&format!("update User {}", id)).unwrap_err();
        assert_eq!(err.to_string(), "** attribute name missing **");
        let err = engine.execute(&format!("update User {} first_name", id)).unwrap_err();
        assert_eq!(err.to_string(), "** value missing **");
    }

    #[test]
    fn test_destroy_then_show() {
        let temp_dir = TempDir::new().unwrap();
        let mut engine = engine_in(&temp_dir);
        let id = created_id(engine.execute("create State").unwrap());

        assert_eq!(
            engine.execute(&format!("destroy State {}", id)).unwrap(),
            CommandResult::Destroyed
        );
        assert!(matches!(
            engine.execute(&format!("show State {}", id)),
            Err(CommandError::NoInstanceFound)
        ));
    }

    #[test]
    fn test_update_missing_key_does_not_mutate() {
        let temp_dir = TempDir::new().unwrap();
        let mut engine = engine_in(&temp_dir);
        engine.execute("create City").unwrap();
        let before = engine.storage().all().clone();

        assert!(matches!(
            engine.execute("update City missing name Paris"),
            Err(CommandError::NoInstanceFound)
        ));
        assert_eq!(engine.storage().all(), &before);
    }

    #[test]
    fn test_update_coerces_and_touches() {
        let temp_dir = TempDir::new().unwrap();
        let mut engine = engine_in(&temp_dir);
        let id = created_id(engine.execute("create Place").unwrap());
        let key = format!("Place.{}", id);
        let before = engine.storage().get(&key).unwrap().updated_at();

        engine
            .execute(&format!("update Place {} price_by_night 12", id))
            .unwrap();

        let place = engine.storage().get(&key).unwrap();
        assert_eq!(place.attr("price_by_night"), Some(&AttrValue::Integer(12)));
        assert!(place.updated_at() > before);
    }

    #[test]
    fn test_update_bad_coercion_aborts() {
        let temp_dir = TempDir::new().unwrap();
        let mut engine = engine_in(&temp_dir);
        let id = created_id(engine.execute("create Place").unwrap());
        let before = engine.storage().all().clone();

        let err = engine
            .execute(&format!("update Place {} max_guest plenty", id))
            .unwrap_err();
        assert!(!err.is_fatal());
        assert!(err.to_string().starts_with("** invalid value for attribute 'max_guest'"));
        assert_eq!(engine.storage().all(), &before);
    }

    #[test]
    fn test_create_with_params() {
        let temp_dir = TempDir::new().unwrap();
        let mut engine = engine_in(&temp_dir);
        let id = created_id(
            engine
                .execute(r#"create Place name="Cozy_loft" number_rooms=3 latitude=48.85 bogus"#)
                .unwrap(),
        );

        let place = engine.storage().get(&format!("Place.{}", id)).unwrap();
        assert_eq!(place.attr("name"), Some(&AttrValue::String("Cozy loft".into())));
        assert_eq!(place.attr("number_rooms"), Some(&AttrValue::Integer(3)));
        assert_eq!(place.attr("latitude"), Some(&AttrValue::Float(48.85)));
    }

    #[test]
    fn test_create_bad_param_registers_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let mut engine = engine_in(&temp_dir);
        assert!(engine.execute("create Place max_guest=many").is_err());
        assert!(engine.storage().all().is_empty());
    }

    #[test]
    fn test_all_and_count() {
        let temp_dir = TempDir::new().unwrap();
        let mut engine = engine_in(&temp_dir);
        let ids: Vec<String> = ["create User", "create User", "create Amenity"]
            .iter()
            .map(|line| created_id(engine.execute(line).unwrap()))
            .collect();

        match engine.execute("all").unwrap() {
            CommandResult::Listed(items) => {
                assert_eq!(items.len(), 3);
                for id in &ids {
                    let marker = format!("({})", id);
                    assert_eq!(items.iter().filter(|item| item.contains(&marker)).count(), 1);
                }
            }
            other => panic!("expected listing, got {:?}", other),
        }
        match engine.execute("all User").unwrap() {
            CommandResult::Listed(items) => {
                assert_eq!(items.len(), 2);
                assert!(items.iter().all(|item| item.starts_with("[User]")));
            }
            other => panic!("expected listing, got {:?}", other),
        }
        assert_eq!(engine.execute("count User").unwrap(), CommandResult::Counted(2));
        assert_eq!(engine.execute("User.count()").unwrap(), CommandResult::Counted(2));
        assert_eq!(engine.execute("count Review").unwrap(), CommandResult::Counted(0));
    }

    #[test]
    fn test_dotted_update_forms() {
        let temp_dir = TempDir::new().unwrap();
        let mut engine = engine_in(&temp_dir);
        let id = created_id(engine.execute("create User").unwrap());
        let key = format!("User.{}", id);

        engine
            .execute(&format!(r#"User.update("{}", "first_name", "Betty Holberton")"#, id))
            .unwrap();
        assert_eq!(
            engine.storage().get(&key).unwrap().attr("first_name"),
            Some(&AttrValue::String("Betty Holberton".into()))
        );

        engine
            .execute(&format!(r#"User.update("{}", {{"last_name": "Ho", "age": 89}})"#, id))
            .unwrap();
        let user = engine.storage().get(&key).unwrap();
        assert_eq!(user.attr("last_name"), Some(&AttrValue::String("Ho".into())));
        assert_eq!(user.extra("age"), Some(&serde_json::json!(89)));
    }

    #[test]
    fn test_dict_update_is_all_or_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let mut engine = engine_in(&temp_dir);
        let id = created_id(engine.execute("create Place").unwrap());
        let before = engine.storage().all().clone();

        let line = format!(r#"Place.update("{}", {{"name": "Loft", "max_guest": "lots"}})"#, id);
        assert!(matches!(engine.execute(&line), Err(CommandError::Model(_))));
        assert_eq!(engine.storage().all(), &before);
    }

    #[test]
    fn test_strict_policy_rejects_unknown_attribute() {
        let temp_dir = TempDir::new().unwrap();
        let storage = FileStorage::open(temp_dir.path().join("file.json")).unwrap();
        let mut engine = CommandEngine::new(storage, AttributePolicy::Strict);
        let id = created_id(engine.execute("create City").unwrap());

        assert!(engine.execute(&format!("update City {} mayor Bob", id)).is_err());
        assert!(engine.execute(&format!("update City {} name Lyon", id)).is_ok());
    }

    #[test]
    fn test_unknown_syntax() {
        let temp_dir = TempDir::new().unwrap();
        let mut engine = engine_in(&temp_dir);
        let err = engine.execute("fly User").unwrap_err();
        assert_eq!(err.to_string(), "*** Unknown syntax: fly User");
    }
}
