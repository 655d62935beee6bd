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

// Service identity used in the credential scope.
pub const SERVICE_NAME: &str = "AGCODService";
pub const X_AMZ_TARGET_PREFIX: &str = "com.amazonaws.agcod.AGCODService";

// Signing
pub const ALGORITHM: &str = "AWS4-HMAC-SHA256";
pub const KEY_QUALIFIER: &str = "AWS4";
pub const TERMINATION_STRING: &str = "aws4_request";
pub const SIGNED_HEADERS: &str = "accept;host;x-amz-date;x-amz-target";

// Headers
pub const ACCEPT_JSON: &str = "application/json";
pub const X_AMZ_DATE: &str = "x-amz-date";
pub const X_AMZ_TARGET: &str = "x-amz-target";

// Regions
pub const DEFAULT_REGION: &str = "us-east-1";

// Env values used in agcod.
pub const AWS_GIFT_CARD_KEY: &str = "AWS_GIFT_CARD_KEY";
pub const AWS_GIFT_CARD_SECRET: &str = "AWS_GIFT_CARD_SECRET";
pub const AWS_GIFT_CARD_PARTNER_ID: &str = "AWS_GIFT_CARD_PARTNER_ID";
pub const AWS_GIFT_CARD_ENDPOINT: &str = "AWS_GIFT_CARD_ENDPOINT";
pub const AWS_GIFT_CARD_CURRENCY: &str = "AWS_GIFT_CARD_CURRENCY";
pub const AWS_DEBUG: &str = "AWS_DEBUG";
