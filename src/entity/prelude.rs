//! 预导入模块，方便使用

pub use super::file_permissions::{
    ActiveModel as FilePermissionActiveModel, Entity as FilePermissions,
    Model as FilePermissionModel,
};
pub use super::files::{ActiveModel as FileActiveModel, Entity as Files, Model as FileModel};
pub use super::folders::{
    ActiveModel as FolderActiveModel, Entity as Folders, Model as FolderModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
