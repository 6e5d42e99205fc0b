// Copyright 2026 The Hello Triangle Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! # Instance
//!
//! The entry and instance, plus the validation messenger when validation is on.

use std::ffi::{CStr, c_char};

use ash::vk;
use raw_window_handle::RawDisplayHandle;
use tracing::{debug, info};

use crate::debug::{self, DebugMessenger};
use crate::prelude::*;

pub static VALIDATION_LAYER: &CStr = c"VK_LAYER_KHRONOS_validation";

pub struct Instance {
    pub entry: ash::Entry,
    pub instance: ash::Instance,
    debug_messenger: Option<DebugMessenger>,
}

impl Instance {
    /// Load Vulkan and create an instance that can make surfaces for `display`.
    pub fn new(display: RawDisplayHandle, validation: bool) -> Result<Self, SetupError> {
        let entry = unsafe { ash::Entry::load()? };

        let required = required_extensions(&entry, display, validation)?;
        if validation {
            check_validation_layer(&entry)?;
        }

        let app_info = vk::ApplicationInfo::default()
            .application_name(c"Hello Triangle")
            .application_version(vk::make_api_version(0, 1, 0, 0))
            .engine_name(c"No Engine")
            .engine_version(vk::make_api_version(0, 1, 0, 0))
            .api_version(vk::API_VERSION_1_0);

        let extension_names: Vec<*const c_char> = required.iter().map(|n| n.as_ptr()).collect();
        let layer_names: Vec<*const c_char> = if validation {
            vec![VALIDATION_LAYER.as_ptr()]
        } else {
            vec![]
        };

        let mut instance_messenger_ci = debug::messenger_ci();
        let mut instance_ci = vk::InstanceCreateInfo::default()
            .application_info(&app_info)
            .enabled_extension_names(&extension_names)
            .enabled_layer_names(&layer_names);
        if validation {
            instance_ci = instance_ci.push_next(&mut instance_messenger_ci);
        }

        let instance = unsafe { entry.create_instance(&instance_ci, None) }
            .context("failed to create instance")?;

        let mut created = Self {
            entry,
            instance,
            debug_messenger: None,
        };
        if validation {
            created.debug_messenger = Some(DebugMessenger::new(&created.entry, &created.instance)?);
            info!("validation layer enabled");
        }

        Ok(created)
    }
}

impl Drop for Instance {
    fn drop(&mut self) {
        self.debug_messenger.take();
        unsafe { self.instance.destroy_instance(None) };
    }
}

/// Windowing extensions for `display`, plus debug utils with validation.  Every one of them must
/// be available.
fn required_extensions(
    entry: &ash::Entry,
    display: RawDisplayHandle,
    validation: bool,
) -> Result<Vec<&'static CStr>, SetupError> {
    let available = unsafe { entry.enumerate_instance_extension_properties(None) }
        .context("failed to enumerate instance extensions")?;
    let available: Vec<&CStr> = available
        .iter()
        .filter_map(|ext| ext.extension_name_as_c_str().ok())
        .collect();

    debug!("available extensions:");
    available.iter().for_each(|name| debug!("\t{}", name.to_string_lossy()));

    let mut required: Vec<&'static CStr> = ash_window::enumerate_required_extensions(display)
        .context("failed to query windowing extensions")?
        .iter()
        // SAFETY ash-window hands out pointers to static, nul terminated names.
        .map(|&name| unsafe { CStr::from_ptr(name) })
        .collect();
    if validation {
        required.push(vk::EXT_DEBUG_UTILS_NAME);
    }

    debug!("required extensions:");
    for name in &required {
        debug!("\t{}", name.to_string_lossy());
        if !available.contains(name) {
            return Err(SetupError::MissingInstanceExtension(
                name.to_string_lossy().into_owned(),
            ));
        }
    }

    Ok(required)
}

fn check_validation_layer(entry: &ash::Entry) -> Result<(), SetupError> {
    let layers = unsafe { entry.enumerate_instance_layer_properties() }
        .context("failed to enumerate instance layers")?;
    let found = layers
        .iter()
        .filter_map(|layer| layer.layer_name_as_c_str().ok())
        .any(|name| name == VALIDATION_LAYER);

    if found {
        Ok(())
    } else {
        Err(SetupError::MissingValidationLayer(
            VALIDATION_LAYER.to_string_lossy().into_owned(),
        ))
    }
}
