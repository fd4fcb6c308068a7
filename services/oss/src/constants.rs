// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

/// Header that carries the request signature.
pub const OSS_SDK_AUTHORIZATION: &str = "oss_sdk_authorization";
/// Prefix of the authorization header value.
pub const OSS_AUTHORIZATION_PREFIX: &str = "OSS-";
/// Only bodies of this content type are covered by request signatures.
pub const FORM_MIME: &str = "application/x-www-form-urlencoded";

// Separates fields of upload tokens and authorization values.
pub const FIELD_SEPARATOR: char = ':';

// Env values used by osssign.
pub const OSS_ACCESS_KEY_ID: &str = "OSS_ACCESS_KEY_ID";
pub const OSS_ACCESS_KEY_SECRET: &str = "OSS_ACCESS_KEY_SECRET";
pub const OSS_CREDENTIAL_FILE: &str = "OSS_CREDENTIAL_FILE";

pub const DEFAULT_CREDENTIAL_FILE: &str = "~/.oss/credentials.json";
