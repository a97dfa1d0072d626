//! Roles, users and permissions.

use super::ast::*;
use super::parser::Parser;
use crate::diagnostics::ParseError;
use crate::lexer::{Keyword, TokenKind};

impl Parser {
    // ========================================================================
    // Roles
    // ========================================================================

    pub(crate) fn parse_create_role(&mut self) -> Result<Statement, ParseError> {
        let if_not_exists = self.parse_if_not_exists()?;
        let name = self.parse_role_name()?;
        let options = if self.eat_keyword(Keyword::With) {
            self.parse_role_options()?
        } else {
            Vec::new()
        };
        Ok(Statement::CreateRole(CreateRoleStmt {
            if_not_exists,
            name,
            options,
        }))
    }

    pub(crate) fn parse_alter_role(&mut self) -> Result<Statement, ParseError> {
        let name = self.parse_role_name()?;
        self.expect_keyword(Keyword::With)?;
        let options = self.parse_role_options()?;
        Ok(Statement::AlterRole(AlterRoleStmt { name, options }))
    }

    /// `option (AND option)*`
    fn parse_role_options(&mut self) -> Result<Vec<RoleOption>, ParseError> {
        let mut options = Vec::new();
        loop {
            let option = if self.eat_keyword(Keyword::Password) {
                self.expect(TokenKind::Eq)?;
                RoleOption::Password(self.expect_string()?)
            } else if self.eat_keyword(Keyword::Login) {
                self.expect(TokenKind::Eq)?;
                RoleOption::Login(self.parse_bool()?)
            } else if self.eat_keyword(Keyword::Superuser) {
                self.expect(TokenKind::Eq)?;
                RoleOption::Superuser(self.parse_bool()?)
            } else if self.eat_keyword(Keyword::Options) {
                self.expect(TokenKind::Eq)?;
                RoleOption::Options(self.parse_constant_map()?)
            } else {
                return Err(self.unexpected());
            };
            options.push(option);
            if !self.eat_keyword(Keyword::And) {
                break;
            }
        }
        Ok(options)
    }

    /// `[IF EXISTS] name`
    pub(crate) fn parse_drop_principal(&mut self) -> Result<DropPrincipalStmt, ParseError> {
        let if_exists = self.parse_if_exists()?;
        let name = self.parse_role_name()?;
        Ok(DropPrincipalStmt { if_exists, name })
    }

    /// Role and user names may also be written as string literals; those
    /// keep their case like quoted names.
    fn parse_role_name(&mut self) -> Result<Identifier, ParseError> {
        if let TokenKind::String(name) = &self.current().kind {
            let name = Identifier::quoted(name);
            self.advance();
            return Ok(name);
        }
        self.note_expected("string literal");
        self.expect_identifier()
    }

    // ========================================================================
    // Users
    // ========================================================================

    pub(crate) fn parse_create_user(&mut self) -> Result<Statement, ParseError> {
        let if_not_exists = self.parse_if_not_exists()?;
        let name = self.parse_role_name()?;
        let (password, superuser) = self.parse_user_options()?;
        Ok(Statement::CreateUser(CreateUserStmt {
            if_not_exists,
            name,
            password,
            superuser,
        }))
    }

    pub(crate) fn parse_alter_user(&mut self) -> Result<Statement, ParseError> {
        let name = self.parse_role_name()?;
        let (password, superuser) = self.parse_user_options()?;
        Ok(Statement::AlterUser(AlterUserStmt {
            name,
            password,
            superuser,
        }))
    }

    /// `[WITH PASSWORD 'secret'] [SUPERUSER | NOSUPERUSER]`
    fn parse_user_options(&mut self) -> Result<(Option<String>, Option<bool>), ParseError> {
        let password = if self.eat_keyword(Keyword::With) {
            self.expect_keyword(Keyword::Password)?;
            Some(self.expect_string()?)
        } else {
            None
        };
        let superuser = if self.eat_keyword(Keyword::Superuser) {
            Some(true)
        } else if self.eat_keyword(Keyword::Nosuperuser) {
            Some(false)
        } else {
            None
        };
        Ok((password, superuser))
    }

    // ========================================================================
    // Permissions
    // ========================================================================

    /// `GRANT privilege ON resource TO role`
    pub(crate) fn parse_grant(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Grant)?;
        let privilege = self.parse_privilege()?;
        self.expect_keyword(Keyword::On)?;
        let resource = self.parse_resource()?;
        self.expect_keyword(Keyword::To)?;
        let role = self.parse_role_name()?;
        Ok(Statement::Grant(PermissionStmt {
            privilege,
            resource,
            role,
        }))
    }

    /// `REVOKE privilege ON resource FROM role`
    pub(crate) fn parse_revoke(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::Revoke)?;
        let privilege = self.parse_privilege()?;
        self.expect_keyword(Keyword::On)?;
        let resource = self.parse_resource()?;
        self.expect_keyword(Keyword::From)?;
        let role = self.parse_role_name()?;
        Ok(Statement::Revoke(PermissionStmt {
            privilege,
            resource,
            role,
        }))
    }

    /// `LIST ROLES ...`, `LIST USERS` or `LIST privilege ...`.
    pub(crate) fn parse_list(&mut self) -> Result<Statement, ParseError> {
        self.expect_keyword(Keyword::List)?;

        if self.eat_keyword(Keyword::Users) {
            return Ok(Statement::ListUsers);
        }

        if self.eat_keyword(Keyword::Roles) {
            let of = self.parse_of_role()?;
            let recursive = !self.eat_keyword(Keyword::Norecursive);
            return Ok(Statement::ListRoles(ListRolesStmt { of, recursive }));
        }

        let privilege = self.parse_privilege()?;
        let resource = if self.eat_keyword(Keyword::On) {
            Some(self.parse_resource()?)
        } else {
            None
        };
        let of = self.parse_of_role()?;
        let recursive = !self.eat_keyword(Keyword::Norecursive);
        Ok(Statement::ListPermissions(ListPermissionsStmt {
            privilege,
            resource,
            of,
            recursive,
        }))
    }

    fn parse_of_role(&mut self) -> Result<Option<Identifier>, ParseError> {
        if self.eat_keyword(Keyword::Of) {
            Ok(Some(self.parse_role_name()?))
        } else {
            Ok(None)
        }
    }

    /// A privilege keyword, optionally followed by `PERMISSION(S)`.
    fn parse_privilege(&mut self) -> Result<Privilege, ParseError> {
        const PRIVILEGES: &[(Keyword, Privilege)] = &[
            (Keyword::All, Privilege::All),
            (Keyword::Alter, Privilege::Alter),
            (Keyword::Authorize, Privilege::Authorize),
            (Keyword::Describe, Privilege::Describe),
            (Keyword::Execute, Privilege::Execute),
            (Keyword::Create, Privilege::Create),
            (Keyword::Drop, Privilege::Drop),
            (Keyword::Modify, Privilege::Modify),
            (Keyword::Select, Privilege::Select),
        ];

        let privilege = PRIVILEGES
            .iter()
            .find(|(kw, _)| self.check_keyword(*kw))
            .map(|(_, privilege)| *privilege);

        match privilege {
            Some(privilege) => {
                self.advance();
                let _ = self.eat_keyword(Keyword::Permissions) || self.eat_keyword(Keyword::Permission);
                Ok(privilege)
            }
            None => {
                for (kw, _) in PRIVILEGES {
                    self.note_expected(kw.as_str());
                }
                Err(self.unexpected())
            }
        }
    }

    /// The object a permission applies to.
    fn parse_resource(&mut self) -> Result<Resource, ParseError> {
        if self.eat_keyword(Keyword::All) {
            if self.eat_keyword(Keyword::Functions) {
                if self.eat_keyword(Keyword::In) {
                    self.expect_keyword(Keyword::Keyspace)?;
                    return Ok(Resource::AllFunctionsInKeyspace(self.expect_identifier()?));
                }
                return Ok(Resource::AllFunctions);
            }
            if self.eat_keyword(Keyword::Keyspaces) {
                return Ok(Resource::AllKeyspaces);
            }
            if self.eat_keyword(Keyword::Roles) {
                return Ok(Resource::AllRoles);
            }
            return Err(self.unexpected());
        }
        if self.eat_keyword(Keyword::Function) {
            return Ok(Resource::Function(self.parse_qualified_name()?));
        }
        if self.eat_keyword(Keyword::Keyspace) {
            return Ok(Resource::Keyspace(self.expect_identifier()?));
        }
        if self.eat_keyword(Keyword::Role) {
            return Ok(Resource::Role(self.parse_role_name()?));
        }
        let _ = self.eat_keyword(Keyword::Table);
        Ok(Resource::Table(self.parse_qualified_name()?))
    }
}
